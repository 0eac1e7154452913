/// Concurrency used by the level executor when neither the config nor the
/// platform provides a value
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
