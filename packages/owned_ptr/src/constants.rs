// A panic while the value was locked means it may have been left half-updated.
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - continued execution \
    is not safe because the owned value may have been left in an inconsistent state";
