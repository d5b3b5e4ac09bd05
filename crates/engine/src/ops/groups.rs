use crate::{EngineError, Group, GroupCmd, ResultEngine, store::GroupStore};

use super::{Engine, normalize_members, normalize_optional_text, normalize_required_name};

impl<S: GroupStore> Engine<S> {
    /// Creates a group with the acting member as admin and first member.
    pub async fn new_group(&self, user_id: &str, cmd: GroupCmd) -> ResultEngine<Group> {
        let name = normalize_required_name(&cmd.name, "group name")?;
        let description = normalize_optional_text(cmd.description.as_deref());
        let members = normalize_members(cmd.members)?;

        let group = Group::new(
            name,
            description,
            user_id.to_string(),
            members,
            cmd.currency.unwrap_or_default(),
        );
        tracing::info!(group_id = %group.id, admin = user_id, "creating group");
        self.store.create_group(&group).await
    }

    /// Group details for a member. Outsiders get `KeyNotFound`.
    pub async fn group_details(&self, group_id: &str, user_id: &str) -> ResultEngine<Group> {
        self.require_group(group_id, user_id).await
    }

    /// Adds members to a group, skipping ones already present.
    pub async fn add_members(
        &self,
        group_id: &str,
        user_id: &str,
        members: Vec<String>,
    ) -> ResultEngine<Group> {
        self.require_group(group_id, user_id).await?;
        let members = normalize_members(members)?;
        self.store.add_members(group_id, &members).await
    }

    /// Removes members from a group. The admin stays, so the member set can
    /// never become empty.
    pub async fn remove_members(
        &self,
        group_id: &str,
        user_id: &str,
        members: Vec<String>,
    ) -> ResultEngine<Group> {
        let group = self.require_group(group_id, user_id).await?;
        let members = normalize_members(members)?;
        if members.iter().any(|member| *member == group.admin) {
            return Err(EngineError::InvalidMember(
                "cannot remove group admin".to_string(),
            ));
        }
        self.store.remove_members(group_id, &members).await
    }

    /// Every group the acting member belongs to.
    pub async fn my_groups(&self, user_id: &str) -> ResultEngine<Vec<Group>> {
        self.store.groups_for(user_id).await
    }

    /// Groups filtered by their settled flag.
    pub async fn groups_by_status(&self, is_paid: bool) -> ResultEngine<Vec<Group>> {
        self.store.groups_by_status(is_paid).await
    }
}
