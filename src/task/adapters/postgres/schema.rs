//! Diesel schema for task and comment persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning workspace identifier.
        workspace_id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Creator user identifier.
        creator_id -> Uuid,
        /// Optional assignee user identifier.
        assignee_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority level.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comment records.
    comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Owning task identifier.
        task_id -> Uuid,
        /// Authoring user identifier.
        author_id -> Uuid,
        /// Free-text body.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, comments);
