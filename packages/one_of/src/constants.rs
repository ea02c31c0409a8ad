// A handler panicked while the shared value was locked. Its state can no longer be trusted.
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - a handler panicked \
    while it had access to the shared value, which may have been left half-updated";
