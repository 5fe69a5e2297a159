use clap::{Args, Subcommand};
use std::path::PathBuf;

use recipehub::{store, RecipeRecord};

use super::OutputFormat;
use crate::config::Config;

const TITLE_WIDTH: usize = 40;
const MIN_ID_WIDTH: usize = 12;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List recipes in a dataset file
    List {
        /// Dataset file (defaults to the configured output)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID
        id: String,

        /// Dataset file (defaults to the configured output)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl RecipeCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::List { input, format } => {
                let path = input.clone().unwrap_or_else(|| config.output.value.clone());
                let dataset = store::load(Some(path.as_path()))?;

                if dataset.is_empty() {
                    println!("No recipes found in {}", path.display());
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&dataset.recipes)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", render_table(&dataset.recipes));
                        println!("\nTotal: {} recipe(s)", dataset.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { id, input, format } => {
                let path = input.clone().unwrap_or_else(|| config.output.value.clone());
                let dataset = store::load(Some(path.as_path()))?;

                match dataset.find(id) {
                    Some(recipe) => {
                        match format {
                            OutputFormat::Json => {
                                println!("{}", serde_json::to_string_pretty(recipe)?);
                            }
                            OutputFormat::Text => {
                                println!("{}", recipe);
                            }
                        }
                        Ok(())
                    }
                    None => Err(format!("Recipe not found: {}", id).into()),
                }
            }
        }
    }
}

fn render_table(recipes: &[RecipeRecord]) -> String {
    let ids: Vec<String> = recipes.iter().map(|r| r.id.to_string()).collect();
    let id_width = ids
        .iter()
        .map(|id| id.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_ID_WIDTH);

    let mut out = format!("{:<id_width$}  {:<TITLE_WIDTH$}  READY\n", "ID", "TITLE");
    out.push_str(&"-".repeat(id_width + 2 + TITLE_WIDTH + 2 + 9));
    out.push('\n');

    for (recipe, id) in recipes.iter().zip(&ids) {
        let title = if recipe.title.chars().count() > TITLE_WIDTH {
            let cut: String = recipe.title.chars().take(TITLE_WIDTH - 3).collect();
            format!("{}...", cut)
        } else {
            recipe.title.clone()
        };
        out.push_str(&format!(
            "{:<id_width$}  {:<TITLE_WIDTH$}  {} min\n",
            id, title, recipe.ready_in_minutes
        ));
    }
    out
}
