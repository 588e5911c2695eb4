use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use construct_engine::core::{
    read_json, write_json, CompositionRequest, ConstructCatalog, ConstructComposition,
    ConstructLevel, ConstructSource, DiagramContent, DiagramFormat, DiagramLevel, Engine,
    UsageAssumptions,
};

#[derive(Parser)]
#[command(name = "constructs")]
#[command(about = "Compose, validate, cost and diagram reusable infrastructure constructs")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source file into a construct definition
    Analyze {
        /// Source file to analyze
        file: PathBuf,

        /// Construct name
        #[arg(short, long)]
        name: String,

        /// Construct level (L0-L3)
        #[arg(short, long, default_value = "L1")]
        level: ConstructLevel,

        /// Cloud provider
        #[arg(short, long)]
        provider: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Source language (detected from the extension when omitted)
        #[arg(long)]
        language: Option<String>,

        /// Category (inferred from the name when omitted)
        #[arg(long)]
        category: Option<String>,

        /// Extra tags, comma separated
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Write the definition here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a construct catalog from a source directory
    Catalog {
        /// Directory to scan
        dir: PathBuf,

        #[arg(short, long, default_value = "L1")]
        level: ConstructLevel,

        #[arg(short, long)]
        provider: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compose constructs into a composition
    Compose {
        /// Construct catalog (JSON)
        #[arg(long)]
        catalog: PathBuf,

        /// Composition request with a name and instance list (JSON)
        spec: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a composition against a catalog
    Validate {
        #[arg(long)]
        catalog: PathBuf,

        /// Composition (JSON)
        composition: PathBuf,
    },

    /// Estimate the running cost of a composition or a single construct
    Estimate {
        #[arg(long)]
        catalog: PathBuf,

        /// Composition (JSON)
        #[arg(required_unless_present = "construct", conflicts_with = "construct")]
        composition: Option<PathBuf>,

        /// Estimate one catalog construct instead of a composition
        #[arg(long)]
        construct: Option<String>,

        #[arg(short, long)]
        provider: String,

        #[arg(short, long)]
        region: Option<String>,

        /// Expected requests per month
        #[arg(long)]
        requests: Option<f64>,

        /// Expected storage in GB
        #[arg(long)]
        storage_gb: Option<f64>,

        /// Expected compute hours per month
        #[arg(long)]
        compute_hours: Option<f64>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a C4 diagram of a composition
    Diagram {
        #[arg(long)]
        catalog: PathBuf,

        /// Composition (JSON)
        composition: PathBuf,

        /// context, container, component or code
        #[arg(short, long, default_value = "container")]
        level: DiagramLevel,

        /// json, plantuml or mermaid
        #[arg(short, long, default_value = "mermaid")]
        format: DiagramFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Analyze {
                file,
                name,
                level,
                provider,
                description,
                language,
                category,
                tags,
                output,
            } => {
                let Some(language) = language.or_else(|| engine.detect_language(&file)) else {
                    bail!(
                        "Cannot detect the language of {}; pass --language",
                        file.display()
                    );
                };

                let source = ConstructSource {
                    name,
                    description,
                    level,
                    source_code: String::new(),
                    language,
                    provider,
                    category,
                    tags: (!tags.is_empty()).then_some(tags),
                };

                let definition = engine.analyze(&file, source)?;
                write_json(&definition, output.as_deref())
            }
            Commands::Catalog {
                dir,
                level,
                provider,
                output,
            } => {
                let catalog = engine.build_catalog(&dir, level, &provider)?;
                write_json(&catalog, output.as_deref())
            }
            Commands::Compose {
                catalog,
                spec,
                output,
            } => {
                let catalog: ConstructCatalog = read_json(&catalog)?;
                let request: CompositionRequest = read_json(&spec)?;
                let composition = engine.compose(request, &catalog)?;

                info!(
                    "🧩 Composed '{}' with {} instances",
                    composition.name,
                    composition.instances.len()
                );
                write_json(&composition, output.as_deref())
            }
            Commands::Validate {
                catalog,
                composition,
            } => {
                let catalog: ConstructCatalog = read_json(&catalog)?;
                let composition: ConstructComposition = read_json(&composition)?;
                let result = engine.validate(&composition, &catalog);

                write_json(&result, None)?;
                if !result.valid {
                    bail!("Composition has {} validation errors", result.errors.len());
                }
                Ok(())
            }
            Commands::Estimate {
                catalog,
                composition,
                construct,
                provider,
                region,
                requests,
                storage_gb,
                compute_hours,
                output,
            } => {
                let catalog: ConstructCatalog = read_json(&catalog)?;
                let usage = UsageAssumptions {
                    requests,
                    storage_gb,
                    compute_hours,
                };
                let usage = (usage != UsageAssumptions::default()).then_some(usage);

                let estimate = match (composition, construct) {
                    (Some(path), _) => {
                        let composition: ConstructComposition = read_json(&path)?;
                        engine.estimate(
                            &composition,
                            &provider,
                            region.as_deref(),
                            usage.as_ref(),
                            &catalog,
                        )
                    }
                    (None, Some(construct_id)) => engine.estimate_construct(
                        &construct_id,
                        &provider,
                        region.as_deref(),
                        usage.as_ref(),
                        &catalog,
                    )?,
                    (None, None) => bail!("Pass a composition file or --construct"),
                };

                info!(
                    "💰 Estimated {:.2} {} per month",
                    estimate.total.monthly, estimate.currency
                );
                write_json(&estimate, output.as_deref())
            }
            Commands::Diagram {
                catalog,
                composition,
                level,
                format,
                output,
            } => {
                let catalog: ConstructCatalog = read_json(&catalog)?;
                let composition: ConstructComposition = read_json(&composition)?;
                let diagram = engine.diagram(&composition, level, format, &catalog);

                match (&diagram.content, output) {
                    (DiagramContent::Text(text), Some(path)) => {
                        std::fs::write(&path, text)?;
                        info!("📝 Wrote {} diagram to {}", diagram.format, path.display());
                        Ok(())
                    }
                    (DiagramContent::Text(text), None) => {
                        print!("{}", text);
                        Ok(())
                    }
                    (DiagramContent::Structured(_), output) => {
                        write_json(&diagram, output.as_deref())
                    }
                }
            }
        }
    }
}
