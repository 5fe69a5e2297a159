//! Incremental pagination-and-merge.
//!
//! Pages through the remote listing starting at a given page, fetches and
//! normalizes every recipe whose id is not yet in the dataset, and saves the
//! dataset after each page. A page's records are only appended once every
//! detail on that page has been fetched, so the file on disk always reflects
//! whole pages.
//!
//! The loop ends normally on a failed listing request, or after the highest
//! page number has been processed. The hub has no explicit last-page marker,
//! so an error status past the end of the collection and a transient failure
//! look the same and both stop the run.

use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::hub::{RecipeSource, RemoteError, DEFAULT_SORT_TYPE};
use crate::models::{Dataset, KnownIds, RecipeId, RecipeRecord};
use crate::normalize::{normalize_recipe, NormalizeError};
use crate::store::{self, StoreError};

pub const DEFAULT_START_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Where to start paging and how.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    pub start_page: u32,
    pub page_size: u32,
    pub sort_type: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            start_page: DEFAULT_START_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_type: DEFAULT_SORT_TYPE.to_string(),
        }
    }
}

/// Why paging stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum HaltReason {
    /// The listing request for the halting page failed
    ListingFailed(RemoteError),
    /// The halting page was the last page number that can be requested
    LastPageNumber,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::ListingFailed(e) => write!(f, "{}", e),
            HaltReason::LastPageNumber => write!(f, "no page numbers left to request"),
        }
    }
}

/// Outcome of a run that ended without a fatal error.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    /// Pages fully processed and checkpointed
    pub pages_processed: u32,
    pub recipes_added: usize,
    /// Page whose listing request failed, or the last page processed
    pub halted_at_page: u32,
    pub halt_reason: HaltReason,
}

/// Failures that abort a run.
///
/// Everything checkpointed before the failing page stays on disk.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Failed to fetch recipe {id} on page {page}: {source}")]
    Detail {
        id: RecipeId,
        page: u32,
        #[source]
        source: RemoteError,
    },

    #[error("Recipe {id} on page {page} is malformed: {source}")]
    MalformedRecord {
        id: RecipeId,
        page: u32,
        #[source]
        source: NormalizeError,
    },

    #[error("Failed to save checkpoint after page {page}: {source}")]
    Store {
        page: u32,
        #[source]
        source: StoreError,
    },
}

/// Merges new recipes from `source` into `dataset`, saving to `output` after
/// every page.
///
/// Runs until a listing request fails. Detail failures, malformed records
/// and checkpoint write failures abort with an error.
pub fn merge_recipes<S: RecipeSource + ?Sized>(
    source: &S,
    dataset: &mut Dataset,
    output: &Path,
    options: &MergeOptions,
) -> Result<MergeSummary, MergeError> {
    let mut known = KnownIds::from_dataset(dataset);
    if known.is_empty() {
        tracing::info!("Starting from an empty dataset");
    } else {
        tracing::info!("Starting with {} known recipe(s)", known.len());
    }
    let mut pages_processed: u32 = 0;
    let mut recipes_added = 0;

    let mut page = options.start_page;
    loop {
        tracing::info!(
            "Processing page {} with step {}",
            page,
            options.page_size
        );

        let entries = match source.fetch_page(page, options.page_size, &options.sort_type) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Stopping at page {}: {}", page, e);
                return Ok(MergeSummary {
                    pages_processed,
                    recipes_added,
                    halted_at_page: page,
                    halt_reason: HaltReason::ListingFailed(e),
                });
            }
        };

        let mut page_ids = KnownIds::default();
        let new_entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| {
                !known.contains(&entry.recipe_id) && page_ids.insert(entry.recipe_id.clone())
            })
            .collect();

        tracing::debug!("Page {} has {} new recipe(s)", page, new_entries.len());

        let mut page_records: Vec<RecipeRecord> = Vec::with_capacity(new_entries.len());
        for entry in &new_entries {
            let detail = source
                .fetch_detail(&entry.recipe_id)
                .map_err(|e| MergeError::Detail {
                    id: entry.recipe_id.clone(),
                    page,
                    source: e,
                })?;

            let record = normalize_recipe(&detail, entry.description.as_deref()).map_err(|e| {
                MergeError::MalformedRecord {
                    id: entry.recipe_id.clone(),
                    page,
                    source: e,
                }
            })?;

            tracing::debug!(id = %record.id, title = %record.title, "Fetched recipe");
            page_records.push(record);
        }

        // The stored id comes from the detail, which may not match the listing.
        for record in page_records {
            if !known.insert(record.id.clone()) {
                tracing::warn!(
                    "Skipping recipe {} on page {}: id is already in the dataset",
                    record.id,
                    page
                );
                continue;
            }
            dataset.recipes.push(record);
            recipes_added += 1;
        }

        store::save(dataset, output).map_err(|e| MergeError::Store { page, source: e })?;
        pages_processed = pages_processed.saturating_add(1);
        tracing::info!("Wrote output - {}", output.display());

        page = match page.checked_add(1) {
            Some(next) => next,
            None => {
                tracing::warn!("Stopping after page {}: no page numbers left", page);
                return Ok(MergeSummary {
                    pages_processed,
                    recipes_added,
                    halted_at_page: page,
                    halt_reason: HaltReason::LastPageNumber,
                });
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawListingEntry, RawRecipeDetail};
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use tempfile::{tempdir, TempDir};

    /// In-memory recipe source. Pages not configured fail with a 404.
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<u32, Vec<RawListingEntry>>,
        details: HashMap<RecipeId, RawRecipeDetail>,
        page_calls: RefCell<Vec<(u32, u32, String)>>,
        detail_calls: RefCell<Vec<RecipeId>>,
    }

    impl FakeSource {
        fn with_page(mut self, page: u32, ids: &[i64]) -> Self {
            let entries = ids
                .iter()
                .map(|&id| RawListingEntry::new(id, Some(format!("listing {}", id).as_str())))
                .collect();
            self.pages.insert(page, entries);
            for &id in ids {
                self.details.entry(RecipeId::from(id)).or_insert_with(|| detail(id));
            }
            self
        }

        /// Makes the detail for listing id `id` report `reported` as its own id.
        fn with_detail_id(mut self, id: i64, reported: RecipeId) -> Self {
            if let Some(detail) = self.details.get_mut(&RecipeId::from(id)) {
                detail.recipe_id = Some(reported);
            }
            self
        }

        fn without_detail(mut self, id: i64) -> Self {
            self.details.remove(&RecipeId::from(id));
            self
        }

        fn detail_ids(&self) -> Vec<RecipeId> {
            self.detail_calls.borrow().clone()
        }
    }

    impl RecipeSource for FakeSource {
        fn fetch_page(
            &self,
            page: u32,
            page_size: u32,
            sort_type: &str,
        ) -> Result<Vec<RawListingEntry>, RemoteError> {
            self.page_calls
                .borrow_mut()
                .push((page, page_size, sort_type.to_string()));
            self.pages.get(&page).cloned().ok_or(RemoteError::Status {
                url: format!("fake://page/{}", page),
                status: 404,
            })
        }

        fn fetch_detail(&self, id: &RecipeId) -> Result<RawRecipeDetail, RemoteError> {
            self.detail_calls.borrow_mut().push(id.clone());
            self.details.get(id).cloned().ok_or(RemoteError::Status {
                url: format!("fake://recipe/{}", id),
                status: 500,
            })
        }
    }

    fn detail(id: i64) -> RawRecipeDetail {
        RawRecipeDetail {
            recipe_id: Some(RecipeId::from(id)),
            title: Some(format!("Recipe {}", id)),
            description: Some(format!("detail {}", id)),
            prep_minutes: Some(10),
            cook_minutes: Some(20),
            ready_in_minutes: Some(30),
            ..Default::default()
        }
    }

    fn record(id: i64) -> RecipeRecord {
        RecipeRecord::new(id, format!("Recipe {}", id))
            .with_description(format!("listing {}", id))
            .with_times(10, 20, 30)
    }

    fn setup() -> (TempDir, std::path::PathBuf) {
        let temp_dir = tempdir().unwrap();
        let output = temp_dir.path().join("recipes.json");
        (temp_dir, output)
    }

    fn saved_ids(path: &Path) -> Vec<RecipeId> {
        store::load(Some(path))
            .unwrap()
            .recipes
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_default_options() {
        let options = MergeOptions::default();
        assert_eq!(options.start_page, 1);
        assert_eq!(options.page_size, 20);
        assert_eq!(options.sort_type, "Popular");
    }

    #[test]
    fn test_merge_into_empty_dataset() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[1, 2])
            .with_page(2, &[3]);
        let mut dataset = Dataset::new();

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.pages_processed, 2);
        assert_eq!(summary.recipes_added, 3);
        assert_eq!(summary.halted_at_page, 3);
        assert!(matches!(
            summary.halt_reason,
            HaltReason::ListingFailed(RemoteError::Status { status: 404, .. })
        ));
        assert_eq!(dataset.recipes, vec![record(1), record(2), record(3)]);
        assert_eq!(store::load(Some(output.as_path())).unwrap(), dataset);
    }

    #[test]
    fn test_listing_description_overrides_detail() {
        let (_temp, output) = setup();
        let source = FakeSource::default().with_page(1, &[5]);
        let mut dataset = Dataset::new();

        merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();
        assert_eq!(dataset.recipes[0].description, "listing 5");
    }

    #[test]
    fn test_missing_listing_description_falls_back_to_detail() {
        let (_temp, output) = setup();
        let mut source = FakeSource::default().with_page(1, &[5]);
        source.pages.get_mut(&1).unwrap()[0].description = None;
        let mut dataset = Dataset::new();

        merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();
        assert_eq!(dataset.recipes[0].description, "detail 5");
    }

    #[test]
    fn test_resume_skips_known_ids() {
        let (_temp, output) = setup();
        let source = FakeSource::default().with_page(1, &[1, 2, 3]);
        let mut dataset = Dataset::new().with_recipes(vec![record(1), record(2)]);

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.recipes_added, 1);
        assert_eq!(source.detail_ids(), vec![RecipeId::from(3)]);
        assert_eq!(
            saved_ids(&output),
            vec![RecipeId::from(1), RecipeId::from(2), RecipeId::from(3)]
        );
    }

    #[test]
    fn test_all_known_ids_leaves_dataset_unchanged() {
        let (temp, output) = setup();
        let original = Dataset::new().with_recipes(vec![record(1), record(2)]);
        let before = temp.path().join("before.json");
        store::save(&original, &before).unwrap();

        let source = FakeSource::default().with_page(1, &[2, 1]);
        let mut dataset = store::load(Some(before.as_path())).unwrap();

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.recipes_added, 0);
        assert_eq!(summary.pages_processed, 1);
        assert!(source.detail_ids().is_empty());
        assert_eq!(dataset, original);
        assert_eq!(
            std::fs::read(&output).unwrap(),
            std::fs::read(&before).unwrap()
        );
    }

    #[test]
    fn test_detail_failure_discards_current_page() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[1, 2])
            .with_page(2, &[3, 4, 5])
            .without_detail(4);
        let mut dataset = Dataset::new();

        let err = merge_recipes(&source, &mut dataset, &output, &MergeOptions::default())
            .unwrap_err();

        match err {
            MergeError::Detail { id, page, .. } => {
                assert_eq!(id, RecipeId::from(4));
                assert_eq!(page, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(saved_ids(&output), vec![RecipeId::from(1), RecipeId::from(2)]);
        assert_eq!(dataset.len(), 2);
        // Recipe 5 is never requested once 4 fails.
        assert_eq!(
            source.detail_ids(),
            vec![
                RecipeId::from(1),
                RecipeId::from(2),
                RecipeId::from(3),
                RecipeId::from(4)
            ]
        );
    }

    #[test]
    fn test_malformed_detail_aborts() {
        let (_temp, output) = setup();
        let mut source = FakeSource::default()
            .with_page(1, &[1])
            .with_page(2, &[2]);
        source
            .details
            .get_mut(&RecipeId::from(2))
            .unwrap()
            .title = None;
        let mut dataset = Dataset::new();

        let err = merge_recipes(&source, &mut dataset, &output, &MergeOptions::default())
            .unwrap_err();

        assert!(matches!(
            err,
            MergeError::MalformedRecord {
                source: NormalizeError::MissingField("title"),
                page: 2,
                ..
            }
        ));
        assert_eq!(saved_ids(&output), vec![RecipeId::from(1)]);
    }

    #[test]
    fn test_empty_page_is_checkpointed_and_paging_continues() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[])
            .with_page(2, &[7]);
        let mut dataset = Dataset::new();

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.pages_processed, 2);
        assert_eq!(summary.halted_at_page, 3);
        assert_eq!(saved_ids(&output), vec![RecipeId::from(7)]);
    }

    #[test]
    fn test_first_page_failure_writes_nothing() {
        let (_temp, output) = setup();
        let source = FakeSource::default();
        let mut dataset = Dataset::new().with_recipes(vec![record(1)]);

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.pages_processed, 0);
        assert_eq!(summary.halted_at_page, 1);
        assert!(!output.exists());
    }

    #[test]
    fn test_start_page_size_and_sort_are_passed_through() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[1])
            .with_page(4, &[4]);
        let mut dataset = Dataset::new();
        let options = MergeOptions {
            start_page: 4,
            page_size: 50,
            sort_type: "Newest".to_string(),
        };

        let summary = merge_recipes(&source, &mut dataset, &output, &options).unwrap();

        assert_eq!(summary.recipes_added, 1);
        assert_eq!(dataset.recipes, vec![record(4)]);
        assert_eq!(
            *source.page_calls.borrow(),
            vec![
                (4, 50, "Newest".to_string()),
                (5, 50, "Newest".to_string())
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_across_and_within_pages() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[1, 2, 1])
            .with_page(2, &[2, 3, 3])
            .with_page(3, &[3, 1]);
        let mut dataset = Dataset::new();

        merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        let ids = saved_ids(&output);
        assert_eq!(
            ids,
            vec![RecipeId::from(1), RecipeId::from(2), RecipeId::from(3)]
        );
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(source.detail_ids().len(), 3);
    }

    #[test]
    fn test_rerun_from_checkpoint_resumes() {
        let (_temp, output) = setup();
        let failing = FakeSource::default()
            .with_page(1, &[1, 2])
            .with_page(2, &[3])
            .without_detail(3);
        let mut dataset = Dataset::new();
        assert!(merge_recipes(&failing, &mut dataset, &output, &MergeOptions::default()).is_err());

        let healthy = FakeSource::default()
            .with_page(1, &[1, 2])
            .with_page(2, &[3]);
        let mut resumed = store::load(Some(output.as_path())).unwrap();
        let summary =
            merge_recipes(&healthy, &mut resumed, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.recipes_added, 1);
        assert_eq!(healthy.detail_ids(), vec![RecipeId::from(3)]);
        assert_eq!(
            saved_ids(&output),
            vec![RecipeId::from(1), RecipeId::from(2), RecipeId::from(3)]
        );
    }

    #[test]
    fn test_detail_id_already_known_is_not_stored_twice() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[5, 6])
            .with_detail_id(5, RecipeId::from(1))
            .with_detail_id(6, RecipeId::from(1));
        let mut dataset = Dataset::new().with_recipes(vec![record(1)]);

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.recipes_added, 0);
        assert_eq!(saved_ids(&output), vec![RecipeId::from(1)]);
        assert_eq!(dataset.recipes, vec![record(1)]);
    }

    #[test]
    fn test_details_sharing_an_id_on_one_page_are_stored_once() {
        let (_temp, output) = setup();
        let source = FakeSource::default()
            .with_page(1, &[5, 6])
            .with_detail_id(6, RecipeId::from(5))
            .with_page(2, &[7])
            .with_detail_id(7, RecipeId::from(5));
        let mut dataset = Dataset::new();

        let summary =
            merge_recipes(&source, &mut dataset, &output, &MergeOptions::default()).unwrap();

        assert_eq!(summary.recipes_added, 1);
        assert_eq!(summary.pages_processed, 2);
        let ids = saved_ids(&output);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids, vec![RecipeId::from(5)]);
    }

    #[test]
    fn test_last_page_number_ends_cleanly() {
        let (_temp, output) = setup();
        let source = FakeSource::default().with_page(u32::MAX, &[9]);
        let mut dataset = Dataset::new();
        let options = MergeOptions {
            start_page: u32::MAX,
            ..MergeOptions::default()
        };

        let summary = merge_recipes(&source, &mut dataset, &output, &options).unwrap();

        assert_eq!(summary.pages_processed, 1);
        assert_eq!(summary.recipes_added, 1);
        assert_eq!(summary.halted_at_page, u32::MAX);
        assert_eq!(summary.halt_reason, HaltReason::LastPageNumber);
        assert_eq!(saved_ids(&output), vec![RecipeId::from(9)]);
        assert_eq!(source.page_calls.borrow().len(), 1);
    }
}
