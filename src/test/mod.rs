pub(crate) mod quick;
