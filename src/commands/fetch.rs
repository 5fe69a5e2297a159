use clap::Args;
use std::path::PathBuf;

use recipehub::{merge_recipes, store, HubClient, MergeOptions};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct FetchCommand {
    /// Hub authorization value: a token or a full "Bearer ..." header
    #[arg(long)]
    pub bearer: Option<String>,

    /// File to write results to [default: recipes.json]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// File to read and append results to
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Starting page
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub start: u32,

    /// Number of recipes per listing page [default: 20]
    #[arg(long, alias = "page_size", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Listing sort order [default: Popular]
    #[arg(long)]
    pub sort: Option<String>,
}

impl FetchCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let bearer = self.resolve_bearer(config).ok_or(
            "No credential supplied. Pass --bearer, set RECIPEHUB_BEARER, or add bearer to the config file.",
        )?;
        let output = self.resolve_output(config);
        let options = self.merge_options(config);

        let mut dataset = store::load(self.input.as_deref())?;
        let starting_count = dataset.len();

        let client = HubClient::new(config.endpoints(), &bearer)?;
        let summary = merge_recipes(&client, &mut dataset, &output, &options)?;

        println!(
            "Added {} recipe(s) from {} page(s)",
            summary.recipes_added, summary.pages_processed
        );
        println!(
            "Stopped at page {}: {}",
            summary.halted_at_page, summary.halt_reason
        );
        if summary.pages_processed > 0 {
            println!(
                "{} now holds {} recipe(s) ({} before this run)",
                output.display(),
                dataset.len(),
                starting_count
            );
        } else {
            println!("Nothing written to {}", output.display());
        }
        Ok(())
    }

    /// Credential from the command line, falling back to env/config.
    fn resolve_bearer(&self, config: &Config) -> Option<String> {
        self.bearer
            .clone()
            .or_else(|| config.bearer.as_ref().map(|b| b.value.clone()))
            .filter(|b| !b.trim().is_empty())
    }

    fn resolve_output(&self, config: &Config) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| config.output.value.clone())
    }

    fn merge_options(&self, config: &Config) -> MergeOptions {
        MergeOptions {
            start_page: self.start,
            page_size: self.page_size.unwrap_or(config.page_size.value),
            sort_type: self
                .sort
                .clone()
                .unwrap_or_else(|| config.sort_type.value.clone()),
        }
    }
}
