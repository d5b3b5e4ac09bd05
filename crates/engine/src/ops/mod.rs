use crate::{EngineError, Group, ResultEngine, store::GroupStore};

mod balances;
mod expenses;
mod groups;

/// The expense-splitting engine.
///
/// Stateless between calls; everything durable lives behind the store seams.
/// Every operation takes the acting member's email explicitly and is gated
/// on that member belonging to the group it touches.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
}

impl<S> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: GroupStore> Engine<S> {
    /// Loads a group the acting member belongs to, or fails with
    /// `KeyNotFound`. Outsiders get the same error as a missing group.
    pub(crate) async fn require_group(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Group> {
        self.store
            .group_for_member(group_id, user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(group_id.to_string()))
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidTitle(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn normalize_members(members: Vec<String>) -> ResultEngine<Vec<String>> {
    members
        .into_iter()
        .map(|member| {
            let trimmed = member.trim().to_string();
            if trimmed.is_empty() {
                return Err(EngineError::InvalidMember(
                    "member email must not be empty".to_string(),
                ));
            }
            Ok(trimmed)
        })
        .collect()
}
