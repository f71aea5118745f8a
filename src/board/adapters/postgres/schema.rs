//! Diesel schema for board persistence.

diesel::table! {
    /// Named task groupings with a cached task count.
    categories (id) {
        /// Category identifier.
        id -> BigInt,
        /// Unique display name.
        #[max_length = 100]
        name -> Varchar,
        /// Cached count of tasks referencing this category.
        task_count -> BigInt,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> BigInt,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional longer description.
        description -> Nullable<Text>,
        /// Optional category reference, nulled when the category is removed.
        category_id -> Nullable<BigInt>,
        /// Completion flag.
        is_completed -> Bool,
        /// Priority storage string.
        #[max_length = 10]
        priority -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp, set on the open-to-done transition.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Append-only audit trail of task mutations.
    audit_log (id) {
        /// Entry identifier.
        id -> BigInt,
        /// Mutation kind.
        #[max_length = 50]
        action -> Varchar,
        /// Affected table name.
        #[max_length = 50]
        entity -> Varchar,
        /// Affected row identifier; loose reference, no foreign key.
        entity_id -> Nullable<BigInt>,
        /// Free-text description of the mutation.
        detail -> Nullable<Text>,
        /// When the mutation was recorded.
        recorded_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> categories (category_id));
diesel::allow_tables_to_appear_in_same_query!(categories, tasks);
