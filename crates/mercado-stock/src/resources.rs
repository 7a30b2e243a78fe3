//! MCP resource templates backed by the lexicon

use async_trait::async_trait;
use mercado_tools::{ResourceTemplate, Result, UriParams};

use crate::lexicon;

/// `instrumento://{nombre}`: description of an instrument type
#[derive(Debug, Default, Clone, Copy)]
pub struct InstrumentDescriptionResource;

#[async_trait]
impl ResourceTemplate for InstrumentDescriptionResource {
    fn uri_template(&self) -> &'static str {
        "instrumento://{nombre}"
    }

    fn name(&self) -> &'static str {
        "descripcion_instrumento"
    }

    fn description(&self) -> &'static str {
        "Descripción de instrumentos bursátiles: acciones, bonos, cedears, leliqs, fci, etfs."
    }

    async fn read(&self, params: &UriParams) -> Result<String> {
        Ok(lexicon::describe(params.require("nombre")?).to_string())
    }
}

/// `saludo://{nombre}`: personalized greeting
#[derive(Debug, Default, Clone, Copy)]
pub struct InvestorGreetingResource;

#[async_trait]
impl ResourceTemplate for InvestorGreetingResource {
    fn uri_template(&self) -> &'static str {
        "saludo://{nombre}"
    }

    fn name(&self) -> &'static str {
        "saludo_inversor"
    }

    fn description(&self) -> &'static str {
        "Saludo personalizado para el inversor."
    }

    async fn read(&self, params: &UriParams) -> Result<String> {
        Ok(lexicon::greet(params.require("nombre")?))
    }
}
