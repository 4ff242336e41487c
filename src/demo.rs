use chrono::{Duration, Utc};

use crate::backend::MemoryBackend;
use crate::prompts::Prompt;

/// In-memory store seeded with a handful of prompts of different ages, so
/// every card layout (repo/branch labels, relative ages, long text) shows up.
pub(crate) fn create_demo_backend() -> MemoryBackend {
    let now = Utc::now();
    let seed = [
        (
            "demo-0001",
            "Explain why this borrow outlives the closure and suggest the smallest fix",
            Some("promptmaxx"),
            Some("main"),
            Duration::seconds(20),
        ),
        (
            "demo-0002",
            "Write a migration that adds a `pinned` column to prompts, default false",
            Some("promptmaxx"),
            Some("feat/pinning"),
            Duration::minutes(14),
        ),
        (
            "demo-0003",
            "Summarize the failing CI log and list the tests that regressed since yesterday",
            Some("infra-tools"),
            None,
            Duration::hours(5),
        ),
        (
            "demo-0004",
            "Review this diff for off-by-one errors in the pagination cursor",
            None,
            None,
            Duration::days(2),
        ),
        (
            "demo-0005",
            "Turn these meeting notes into a checklist:\n- ship beta\n- fix hotkey on Linux\n- write docs",
            None,
            None,
            Duration::days(21),
        ),
    ];

    let prompts = seed
        .into_iter()
        .map(|(id, text, repo, branch, age)| Prompt {
            id: id.to_string(),
            text: text.to_string(),
            repo: repo.map(str::to_string),
            branch: branch.map(str::to_string),
            timestamp: (now - age).to_rfc3339(),
        })
        .collect::<Vec<_>>();

    tracing::info!("demo backend: {} seeded prompts", prompts.len());
    MemoryBackend::with_prompts(prompts)
}
