use std::sync::Arc;

use tracing::{debug, error};

use crate::context::Context;

use super::merge::merge_all;
use super::{DataError, DataItem, DataMap, DataResult, Provider};

/// An ordered list of providers read and written as one.
///
/// Reads fold the children's maps left to right with [`merge_all`], so a
/// later provider wins on conflicting keys. `None` entries are skipped. The
/// list is fixed at construction.
#[derive(Clone, Default)]
pub struct CompositeProvider {
    providers: Vec<Option<Arc<dyn Provider>>>,
}

impl CompositeProvider {
    pub fn new(providers: Vec<Option<Arc<dyn Provider>>>) -> Self {
        Self { providers }
    }

    /// Convenience constructor for lists without gaps.
    pub fn from_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Provider>>,
    {
        Self::new(providers.into_iter().map(Some).collect())
    }

    pub fn providers(&self) -> &[Option<Arc<dyn Provider>>] {
        &self.providers
    }

    fn children(&self) -> impl Iterator<Item = (usize, &Arc<dyn Provider>)> {
        self.providers
            .iter()
            .enumerate()
            .filter_map(|(index, provider)| provider.as_ref().map(|p| (index, p)))
    }
}

impl std::fmt::Debug for CompositeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeProvider")
            .field("providers", &self.providers.len())
            .field("active", &self.children().count())
            .finish()
    }
}

impl Provider for CompositeProvider {
    /// Stops at the first failing child; no partial result is returned.
    fn get_data(&self, ctx: &Context) -> DataResult<DataMap> {
        let maps = self
            .children()
            .map(|(index, provider)| {
                provider.get_data(ctx).map_err(|err| {
                    error!(index, error = %err, "provider failed to return data");
                    DataError::ProviderFailed {
                        index,
                        source: Box::new(err),
                    }
                })
            })
            .collect::<DataResult<Vec<_>>>()?;
        Ok(merge_all(&maps))
    }

    /// Threads the context through every child in order.
    ///
    /// Static rejections are skipped over. Any other failure discards the
    /// intermediate contexts. When every child rejected the write, the
    /// composite reports [`DataError::StaticProviderNoRuntimeUpdates`] itself.
    fn add_data_to_context(&self, ctx: &Context, items: &[DataItem]) -> DataResult<Context> {
        let mut current = ctx.clone();
        let mut accepted = 0;
        let mut rejected = 0;

        for (index, provider) in self.children() {
            match provider.add_data_to_context(&current, items) {
                Ok(next) => {
                    current = next;
                    accepted += 1;
                }
                Err(err) if err.is_static_rejection() => {
                    debug!(index, "provider does not accept runtime data, skipping");
                    rejected += 1;
                }
                Err(err) => {
                    error!(index, error = %err, "provider failed to add data to context");
                    return Err(DataError::ProviderFailed {
                        index,
                        source: Box::new(err),
                    });
                }
            }
        }

        if accepted == 0 && rejected > 0 {
            return Err(DataError::StaticProviderNoRuntimeUpdates);
        }
        Ok(current)
    }
}
