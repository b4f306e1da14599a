//! Diesel schema for account persistence.

diesel::table! {
    /// User account records.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Unique email address.
        #[max_length = 254]
        email -> Varchar,
        /// Optional first name.
        #[max_length = 150]
        first_name -> Nullable<Varchar>,
        /// Optional last name.
        #[max_length = 150]
        last_name -> Nullable<Varchar>,
        /// Free-text profile bio.
        bio -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
