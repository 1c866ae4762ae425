//! Conditional parallel iteration over instruments.
//!
//! Uses rayon when the `parallel` feature is enabled and the configuration
//! asks for it. Output order always matches input order.

use crate::config::BuildConfig;

/// Maps a function over items, conditionally using parallel iteration.
#[allow(unused_variables)]
pub(crate) fn maybe_parallel_map<T, U, F>(items: &[T], config: &BuildConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}
