/// Component registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("component {component_id} is not tracked")]
    UnknownComponent { component_id: String },
}
