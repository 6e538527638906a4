//! # featuretour-demos
//!
//! The demo pages of the tour. Each page pairs a live example with a
//! description and an excerpt of its own source, shown in a tabbed panel.
//!
//! - [`counter`] - Optimistic counter with rollback
//! - [`comments`] - Optimistic comment list with validation
//! - [`profile`] - Form submission with pending and result states
//! - [`posts`] - Async resource with a loading placeholder
//! - [`approaches`] - Traditional and resource loading in a two-pane panel
//! - [`theme_context`] - Theme propagated to nested consumers
//! - [`boundary`] - Error boundary around a crashing page

pub mod approaches;
pub mod boundary;
pub mod comments;
pub mod content;
pub mod counter;
pub mod posts;
pub mod profile;
pub mod text_field;
pub mod theme_context;

use featuretour_core::{
    Config, CoreResult, DemoConfig, MessageBus, Page, PageId, RandomOutcomes, SimulatedBackend,
};

pub use approaches::ApproachesPage;
pub use boundary::BoundaryPage;
pub use comments::CommentsPage;
pub use counter::CounterPage;
pub use posts::PostsPage;
pub use profile::ProfilePage;
pub use theme_context::ThemeContextPage;

/// Page id of the optimistic counter
pub const COUNTER_PAGE: PageId = 1;
/// Page id of the comment list
pub const COMMENTS_PAGE: PageId = 2;
/// Page id of the profile form
pub const PROFILE_PAGE: PageId = 3;
/// Page id of the posts resource
pub const POSTS_PAGE: PageId = 4;
/// Page id of the loading approaches comparison
pub const APPROACHES_PAGE: PageId = 5;
/// Page id of the theme context demo
pub const THEME_PAGE: PageId = 6;
/// Page id of the error boundary demo
pub const BOUNDARY_PAGE: PageId = 7;

fn backend(
    demo: &DemoConfig,
    failure_message: &str,
    seed: Option<u64>,
    offset: u64,
) -> CoreResult<SimulatedBackend> {
    // Each page gets its own stream so one page's presses don't shift another's outcomes
    let outcomes = match seed {
        Some(seed) => RandomOutcomes::seeded(demo.failure_rate, seed.wrapping_add(offset))?,
        None => RandomOutcomes::new(demo.failure_rate)?,
    };
    Ok(SimulatedBackend::new(
        demo.latency(),
        failure_message,
        outcomes,
    ))
}

/// Builds every page in tour order.
///
/// With a `seed`, the simulated failures are reproducible across runs.
///
/// # Errors
///
/// Returns `CoreError::InvalidFailureRate` for rates outside `0.0..=1.0`,
/// or a panel construction error.
pub fn build_pages(
    config: &Config,
    seed: Option<u64>,
    bus: &MessageBus,
) -> CoreResult<Vec<Box<dyn Page>>> {
    let counter = backend(&config.counter, counter::FAILURE_MESSAGE, seed, 0)?;
    let comments = backend(&config.comments, comments::FAILURE_MESSAGE, seed, 1)?;
    let profile = backend(&config.profile, profile::FAILURE_MESSAGE, seed, 2)?;

    Ok(vec![
        Box::new(CounterPage::new(COUNTER_PAGE, counter, bus)?),
        Box::new(CommentsPage::new(COMMENTS_PAGE, comments, bus)?),
        Box::new(ProfilePage::new(PROFILE_PAGE, profile, bus)?),
        Box::new(PostsPage::new(POSTS_PAGE, config.posts.latency(), bus)?),
        Box::new(ApproachesPage::new(APPROACHES_PAGE, config.posts.latency(), bus)?),
        Box::new(ThemeContextPage::new(THEME_PAGE)?),
        Box::new(BoundaryPage::new(BOUNDARY_PAGE)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use featuretour_core::CoreError;

    #[test]
    fn test_build_pages_in_order() {
        let pages = build_pages(&Config::default(), Some(7), &MessageBus::default())
            .expect("pages build");
        let ids: Vec<PageId> = pages.iter().map(|p| p.id()).collect();
        assert_eq!(
            ids,
            vec![
                COUNTER_PAGE,
                COMMENTS_PAGE,
                PROFILE_PAGE,
                POSTS_PAGE,
                APPROACHES_PAGE,
                THEME_PAGE,
                BOUNDARY_PAGE
            ]
        );
        assert_eq!(pages[0].title(), "Optimistic counter");
        assert_eq!(pages[4].title(), "Loading approaches");
    }

    #[test]
    fn test_build_pages_rejects_bad_rate() {
        let mut config = Config::default();
        config.comments.failure_rate = 1.5;
        let result = build_pages(&config, None, &MessageBus::default());
        assert!(matches!(result, Err(CoreError::InvalidFailureRate(_))));
    }
}
