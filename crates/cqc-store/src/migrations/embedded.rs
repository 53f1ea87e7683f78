//! SQL migrations compiled into the binary

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All migrations, oldest first
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_cqc_schema",
            sql: include_str!("../../migrations/001_cqc_schema.sql"),
        },
        Migration {
            id: "002_cqc_hierarchy_triggers",
            sql: include_str!("../../migrations/002_cqc_hierarchy_triggers.sql"),
        },
        Migration {
            id: "003_course_leaf_views",
            sql: include_str!("../../migrations/003_course_leaf_views.sql"),
        },
        Migration {
            id: "004_cqc_placement_update_guards",
            sql: include_str!("../../migrations/004_cqc_placement_update_guards.sql"),
        },
    ]
}
