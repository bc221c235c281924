//! Reference roadmap used by the `roadmap sample` command and by tests.

use crate::models::{
    Engineer, ExternalLoad, Initiative, PlanInput, PlanSettings, Priority, Team,
};

/// Two teams, five engineers, two external loads, five initiatives over the
/// default 10-period horizon.
pub fn sample_plan() -> PlanInput {
    PlanInput::new(PlanSettings::default())
        .with_team(
            Team::new("team-frontend")
                .with_name("Frontend")
                .with_engineer("eng-alice")
                .with_engineer("eng-bob")
                .with_engineer("eng-cara"),
        )
        .with_team(
            Team::new("team-backend")
                .with_name("Backend")
                .with_engineer("eng-dan")
                .with_engineer("eng-eve"),
        )
        .with_engineer(
            Engineer::new(
                "eng-alice",
                "team-frontend",
                vec![8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 7.0, 8.0, 8.0, 8.0],
            )
            .with_name("Alice Chen")
            .with_initials("A"),
        )
        .with_engineer(
            Engineer::new(
                "eng-bob",
                "team-frontend",
                vec![6.0, 6.0, 6.0, 6.0, 6.0, 5.0, 6.0, 6.0, 6.0, 6.0],
            )
            .with_name("Bob Kumar")
            .with_initials("B"),
        )
        .with_engineer(
            Engineer::new(
                "eng-cara",
                "team-frontend",
                vec![5.0, 5.0, 5.0, 4.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
            )
            .with_name("Cara Jones")
            .with_initials("C"),
        )
        .with_engineer(
            Engineer::new(
                "eng-dan",
                "team-backend",
                vec![10.0, 10.0, 9.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0],
            )
            .with_name("Dan Park")
            .with_initials("D"),
        )
        .with_engineer(
            Engineer::new(
                "eng-eve",
                "team-backend",
                vec![8.0, 8.0, 8.0, 8.0, 8.0, 7.0, 8.0, 8.0, 8.0, 8.0],
            )
            .with_name("Eve Santos")
            .with_initials("E"),
        )
        .with_external_load(
            ExternalLoad::new("load-support-frontend", "team-frontend", vec![2.0; 10])
                .with_name("Support"),
        )
        .with_external_load(
            ExternalLoad::new(
                "load-urgent-backend",
                "team-backend",
                vec![1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0],
            )
            .with_name("Urgent requests"),
        )
        .with_initiative(
            Initiative::new("init-auth", "team-backend", 13.0)
                .with_name("User Auth Flow")
                .with_priority(Priority::P0),
        )
        .with_initiative(
            Initiative::new("init-dashboard", "team-frontend", 21.0)
                .with_name("Dashboard UI")
                .with_priority(Priority::P1)
                .with_dependency("init-auth"),
        )
        .with_initiative(
            Initiative::new("init-api", "team-backend", 8.0)
                .with_name("API Gateway")
                .with_priority(Priority::P0),
        )
        .with_initiative(
            Initiative::new("init-search", "team-frontend", 13.0)
                .with_name("Search Feature")
                .with_priority(Priority::P2)
                .with_dependency("init-dashboard"),
        )
        .with_initiative(
            Initiative::new("init-payment", "team-backend", 18.0)
                .with_name("Payment Integration")
                .with_priority(Priority::P1)
                .with_dependency("init-auth")
                .with_dependency("init-api")
                .with_target_window(3, 6),
        )
}
