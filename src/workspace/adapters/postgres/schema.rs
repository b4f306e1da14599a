//! Diesel schema for workspace persistence.

diesel::table! {
    /// Workspace records.
    workspaces (id) {
        /// Workspace identifier.
        id -> Uuid,
        /// Workspace display name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Owner user identifier.
        owner_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Explicit workspace membership rows (owner excluded).
    workspace_members (workspace_id, user_id) {
        /// Workspace identifier.
        workspace_id -> Uuid,
        /// Member user identifier.
        user_id -> Uuid,
    }
}

diesel::joinable!(workspace_members -> workspaces (workspace_id));
diesel::allow_tables_to_appear_in_same_query!(workspaces, workspace_members);
