/// Recommended error type for a scenario `main` function and any shared behaviour code. This is
/// compatible with [crate::definition::HookResult] so `?` propagates either way.
pub type GustResult<T> = anyhow::Result<T>;
