use serde::Serialize;

pub const DEFAULT_CHARM_NAME: &str = "parca-scrape-target";

/// Identifies the unit publishing the scrape jobs. Parca attaches these as
/// labels to the profiles it scrapes, so the profiles can be traced back to
/// the model they were configured in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub model: String,
    pub model_uuid: String,
    pub application: String,
    pub unit: String,
    pub charm_name: String,
}

impl Topology {
    /// Builds the topology of `unit` (`<application>/<number>`). A unit name
    /// without a `/` is used as the application name as-is.
    pub fn new(
        model: impl Into<String>,
        model_uuid: impl Into<String>,
        unit: impl Into<String>,
        charm_name: impl Into<String>,
    ) -> Self {
        let unit = unit.into();
        let application = match unit.split_once('/') {
            Some((application, _)) => application.to_string(),
            None => unit.clone(),
        };

        Self {
            model: model.into(),
            model_uuid: model_uuid.into(),
            application,
            unit,
            charm_name: charm_name.into(),
        }
    }
}
