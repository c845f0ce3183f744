//! `docent generate` handler.

use super::commands::GenerateArgs;
use super::{print_json, read_input};
use docent::{
    BuilderError, DocentResult, GenerationPolicy, NarrationConfig,
    ProviderCascade, ScriptGenerator, SectionRequestBuilder,
};
use std::sync::Arc;
use tracing::info;

/// Generate one section script and print the outcome.
///
/// Without `--offline` the providers configured in the environment are
/// used and exhaustion is an error unless `--allow-fallback` is given.
pub async fn generate_script(args: GenerateArgs, config: NarrationConfig) -> DocentResult<bool> {
    let mut builder = SectionRequestBuilder::default();
    builder
        .section_title(args.title)
        .section_summary(args.summary)
        .keywords(args.keywords)
        .paper_title(args.paper_title)
        .paper_abstract(args.paper_abstract);
    if let Some(path) = &args.context {
        builder.retrieved_context(read_input(path)?);
    }
    let request = builder
        .build()
        .map_err(|e| BuilderError::from_builder("SectionRequest", e))?;

    let generator = if args.offline {
        ScriptGenerator::offline(config)
    } else {
        let cascade = ProviderCascade::from_env()?;
        info!(providers = cascade.len(), "Using configured providers");
        let generator = ScriptGenerator::new(Arc::new(cascade), config);
        if args.allow_fallback {
            generator.with_policy(GenerationPolicy::AllowHeuristicFallback)
        } else {
            generator
        }
    };

    let outcome = match args.max_attempts {
        Some(max_attempts) => generator.generate_with_attempts(&request, max_attempts).await?,
        None => generator.generate(&request).await?,
    };

    info!(
        attempt = outcome.meta().attempt(),
        fallback = outcome.meta().fallback(),
        "Script generated"
    );
    print_json(&outcome)?;
    Ok(true)
}
