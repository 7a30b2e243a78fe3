//! Instrument descriptions and the investor greeting

/// Returned by [`describe`] for keys outside the table
pub const NOT_RECOGNIZED: &str = "Instrumento no reconocido.";

/// Known instrument types and their descriptions
pub const INSTRUMENTS: [(&str, &str); 6] = [
    (
        "acciones",
        "Participaciones en el capital de una empresa. Pueden ganar valor o generar dividendos.",
    ),
    (
        "bonos",
        "Títulos de deuda emitidos por el Estado o empresas, que pagan intereses.",
    ),
    (
        "cedears",
        "Certificados que representan acciones extranjeras, operables en pesos.",
    ),
    (
        "leliqs",
        "Instrumento del BCRA a corto plazo para controlar la liquidez del mercado.",
    ),
    (
        "fci",
        "Fondos Comunes de Inversión: instrumentos que agrupan capital de varios inversores para diversificar riesgos.",
    ),
    (
        "etfs",
        "Fondos cotizados que replican índices o sectores, disponibles a través de CEDEARs.",
    ),
];

/// Describe an instrument type, ignoring case
pub fn describe(key: &str) -> &'static str {
    let key = key.to_lowercase();
    INSTRUMENTS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(NOT_RECOGNIZED, |&(_, description)| description)
}

/// Greet an investor by name; the name is used as given
pub fn greet(name: &str) -> String {
    format!("Hola {name}, bienvenido a tu portal del Mercado Bursátil Argentino. ¡Listo para invertir?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_ignores_case() {
        assert_eq!(describe("ACCIONES"), describe("acciones"));
        assert_eq!(describe("Cedears"), INSTRUMENTS[2].1);
    }

    #[test]
    fn test_describe_every_key() {
        for (key, description) in INSTRUMENTS {
            assert_eq!(describe(key), description);
            assert_ne!(describe(key), NOT_RECOGNIZED);
        }
    }

    #[test]
    fn test_describe_unknown() {
        assert_eq!(describe("unknown-key"), NOT_RECOGNIZED);
        assert_eq!(describe(""), NOT_RECOGNIZED);
        assert_eq!(describe(" acciones"), NOT_RECOGNIZED);
    }

    #[test]
    fn test_greet() {
        let greeting = greet("Ana");
        assert_eq!(
            greeting,
            "Hola Ana, bienvenido a tu portal del Mercado Bursátil Argentino. ¡Listo para invertir?"
        );
    }

    #[test]
    fn test_greet_is_verbatim() {
        assert!(greet("  <b>Ana</b> ").contains("Hola   <b>Ana</b> ,"));
        assert!(greet("").starts_with("Hola ,"));
    }
}
