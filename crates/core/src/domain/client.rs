use serde::{Deserialize, Serialize};

pub const OBSERVATIONS_MAX_CHARS: usize = 500;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub observations: String,
}

impl ClientProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), ..Self::default() }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = non_blank(company.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = non_blank(phone.into());
        self
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.set_observations(observations);
        self
    }

    /// Input-side bound: anything past [`OBSERVATIONS_MAX_CHARS`] characters is dropped.
    pub fn set_observations(&mut self, observations: impl Into<String>) {
        let observations = observations.into();
        self.observations = match observations.char_indices().nth(OBSERVATIONS_MAX_CHARS) {
            Some((cut, _)) => observations[..cut].to_string(),
            None => observations,
        };
    }

    pub fn observations_len(&self) -> usize {
        self.observations.chars().count()
    }

    pub fn observations_counter(&self) -> String {
        format!("{}/{} characters", self.observations_len(), OBSERVATIONS_MAX_CHARS)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
