use tracing::{debug, warn};

use crate::context::Context;
use crate::data::{DataItem, DataMap, Provider};
use crate::script::ExecutableUnit;

use super::EvalError;

/// Enriches `ctx` through `provider`, reporting failures the same way for
/// every engine backend.
///
/// Without a provider the call fails with [`EvalError::NoProvider`] and
/// nothing is written. A provider error is wrapped in
/// [`EvalError::ContextEnrichment`]; if the provider committed part of the
/// items, the enriched context is still reachable through
/// [`EvalError::partial_context`].
pub fn add_data_to_context_helper(
    ctx: &Context,
    provider: Option<&dyn Provider>,
    items: &[DataItem],
) -> Result<Context, EvalError> {
    let provider = provider.ok_or_else(|| {
        warn!("no data provider available for context enrichment");
        EvalError::NoProvider
    })?;

    let enriched = provider.add_data_to_context(ctx, items).map_err(|err| {
        warn!(items = items.len(), error = %err, "failed to add data to context");
        EvalError::ContextEnrichment(err)
    })?;
    debug!(items = items.len(), "added data to context");
    Ok(enriched)
}

/// Reads the merged input data a script evaluated with `ctx` should see.
pub fn load_input_data(ctx: &Context, unit: &ExecutableUnit) -> Result<DataMap, EvalError> {
    unit.data_provider().get_data(ctx).map_err(|err| {
        warn!(unit = %unit.id(), error = %err, "failed to load input data");
        EvalError::InputData(err)
    })
}

/// Fails with [`EvalError::Cancelled`] once `ctx` has been cancelled.
pub fn ensure_active(ctx: &Context) -> Result<(), EvalError> {
    if ctx.is_cancelled() {
        return Err(EvalError::Cancelled);
    }
    Ok(())
}
