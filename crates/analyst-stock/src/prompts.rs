//! Prompt templates for narrative commentary
//!
//! Each analysis step sends one prompt and has one fallback sentence for
//! when the provider fails. Both are minijinja templates rendered with the
//! ticker, industry and horizon of the current analysis.

use minijinja::{Environment, context};

use crate::error::Result;

pub const ECONOMIC_OUTLOOK: &str = "economic_outlook";
pub const INDUSTRY_TRENDS: &str = "industry_trends";
pub const COMPANY_EVALUATION: &str = "company_evaluation";

const ECONOMIC_OUTLOOK_PROMPT: &str = "Provide a brief economic outlook, including interest rates, \
inflation trends, and geopolitical risks for the next {{ horizon }} months.";
const INDUSTRY_TRENDS_PROMPT: &str = "Provide a brief analysis of trends, growth drivers, and risks \
in the {{ industry }} industry for the next {{ horizon }} months.";
const COMPANY_EVALUATION_PROMPT: &str = "Provide a brief evaluation of {{ symbol }}'s competitive \
position, management quality, and growth prospects.";

const ECONOMIC_OUTLOOK_FALLBACK: &str = "Stable economy, moderate growth expected.";
const INDUSTRY_TRENDS_FALLBACK: &str = "{{ industry }} shows steady growth.";
const COMPANY_EVALUATION_FALLBACK: &str = "{{ symbol }} has strong market position.";

/// Compiled prompt and fallback templates
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    /// Compile all templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, prompt, fallback) in [
            (ECONOMIC_OUTLOOK, ECONOMIC_OUTLOOK_PROMPT, ECONOMIC_OUTLOOK_FALLBACK),
            (INDUSTRY_TRENDS, INDUSTRY_TRENDS_PROMPT, INDUSTRY_TRENDS_FALLBACK),
            (COMPANY_EVALUATION, COMPANY_EVALUATION_PROMPT, COMPANY_EVALUATION_FALLBACK),
        ] {
            env.add_template(name, prompt)?;
            env.add_template(fallback_name(name), fallback)?;
        }
        Ok(Self { env })
    }

    pub fn economic_outlook(&self, horizon_months: u32) -> Result<RenderedPrompt> {
        self.render(ECONOMIC_OUTLOOK, &context! { horizon => horizon_months })
    }

    pub fn industry_trends(&self, industry: &str, horizon_months: u32) -> Result<RenderedPrompt> {
        self.render(
            INDUSTRY_TRENDS,
            &context! { industry => industry, horizon => horizon_months },
        )
    }

    pub fn company_evaluation(&self, symbol: &str) -> Result<RenderedPrompt> {
        self.render(COMPANY_EVALUATION, &context! { symbol => symbol })
    }

    fn render(&self, name: &str, ctx: &minijinja::Value) -> Result<RenderedPrompt> {
        let prompt = self.env.get_template(name)?.render(ctx)?;
        let fallback = self.env.get_template(fallback_name(name))?.render(ctx)?;
        Ok(RenderedPrompt { prompt, fallback })
    }
}

fn fallback_name(name: &str) -> &'static str {
    match name {
        ECONOMIC_OUTLOOK => "economic_outlook.fallback",
        INDUSTRY_TRENDS => "industry_trends.fallback",
        _ => "company_evaluation.fallback",
    }
}

/// A prompt together with the sentence used if the provider fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub prompt: String,
    pub fallback: String,
}
