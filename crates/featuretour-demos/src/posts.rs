//! Reading an async resource: the posts list shows a loading placeholder
//! until a delayed fetch resolves.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::{
    CoreResult, Message, MessageBus, Page, PageId, Resource, ResourceLoader, Theme,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use serde::Deserialize;
use std::time::Duration;

use crate::content::{hint_line, DemoPanel};

/// Number of posts shown from the fixture
pub const POST_LIMIT: usize = 9;

const DESCRIPTION: &str = "\
Reading a resource suspends rendering until its value is available.

When this page is opened the posts are requested from a simulated API.
Until they arrive the list shows a loading placeholder; after that the
posts are rendered straight from the resolved value. The request is made
once and the result is kept, so switching pages and coming back does not
fetch again.

Press r to start a new request. A request that is overtaken by a newer one
is discarded when it finishes.";

const POSTS_JSON: &str = r#"[
  {"id": 1, "title": "Optimistic updates without the flicker", "body": "Show the expected result first and reconcile when the server answers."},
  {"id": 2, "title": "Forms that report their own state", "body": "Pending, success and error all live next to the button that caused them."},
  {"id": 3, "title": "Reading resources while rendering", "body": "A loading placeholder stands in until the value resolves."},
  {"id": 4, "title": "Context without prop drilling", "body": "Deeply nested consumers read the theme from the nearest provider."},
  {"id": 5, "title": "Error boundaries in practice", "body": "A crashing component is replaced by a fallback instead of taking the page down."},
  {"id": 6, "title": "Preloading what comes next", "body": "Start fetching before the user asks and the wait disappears."},
  {"id": 7, "title": "Document metadata from components", "body": "Titles and descriptions declared where they are used."},
  {"id": 8, "title": "Streaming the slow parts", "body": "Send the shell first and fill in the rest as it becomes ready."},
  {"id": 9, "title": "Hydration mismatches explained", "body": "What happens when the server and the client disagree."},
  {"id": 10, "title": "Refs as plain props", "body": "Passing a ref no longer needs a wrapper."}
]"#;

/// A post returned by the simulated API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// Post number
    pub id: u32,
    /// Headline
    pub title: String,
    /// Teaser text
    pub body: String,
}

/// Parses the bundled fixture and keeps the first [`POST_LIMIT`] posts.
pub fn fetch_posts() -> Result<Vec<Post>, String> {
    let posts: Vec<Post> = serde_json::from_str(POSTS_JSON)
        .map_err(|err| format!("Failed to load posts: {err}"))?;
    Ok(posts.into_iter().take(POST_LIMIT).collect())
}

/// Posts page state
pub struct PostsPage {
    id: PageId,
    panel: DemoPanel,
    loader: ResourceLoader<Vec<Post>>,
    latency: Duration,
    requested: bool,
}

impl PostsPage {
    /// Creates the page. Nothing is fetched until it is focused.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId, latency: Duration, bus: &MessageBus) -> CoreResult<Self> {
        let bus = bus.clone();
        let loader = ResourceLoader::new().with_notifier(move || {
            let _ = bus.send(Message::Redraw);
        });
        Ok(PostsPage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("posts.rs"))?,
            loader,
            latency,
            requested: false,
        })
    }

    /// Current state of the posts resource
    pub fn state(&self) -> Resource<Vec<Post>> {
        self.loader.state()
    }

    /// Starts a new fetch, superseding any in flight.
    pub fn reload(&mut self) {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!("posts requested outside of a runtime");
            return;
        }
        self.requested = true;
        self.loader.load(self.latency, || async { fetch_posts() });
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [list, hints] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.muted())
            .title(" Posts ");

        match self.loader.state() {
            Resource::Loading => frame.render_widget(
                Paragraph::new(Line::styled(
                    "Loading posts...",
                    Style::default().fg(theme.colors.warning),
                ))
                .block(block),
                list,
            ),
            Resource::Failed(message) => frame.render_widget(
                Paragraph::new(Line::styled(message, Style::default().fg(theme.colors.error)))
                    .block(block),
                list,
            ),
            Resource::Ready(posts) => {
                let items: Vec<ListItem> = posts
                    .iter()
                    .map(|post| {
                        ListItem::new(vec![
                            Line::from(vec![
                                Span::styled(format!("#{} ", post.id), theme.muted()),
                                Span::styled(post.title.clone(), theme.highlight()),
                            ]),
                            Line::styled(format!("   {}", post.body), theme.base()),
                        ])
                    })
                    .collect();
                frame.render_widget(List::new(items).block(block), list);
            }
        }

        frame.render_widget(hint_line(&[("r", "reload")], theme), hints);
    }
}

impl Page for PostsPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Posts resource"
    }

    fn focus(&mut self) {
        if !self.requested {
            self.reload();
        }
    }

    fn blur(&mut self) {}

    fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.panel
            .render(frame, area, theme, self.title(), |frame, area| {
                self.view_example(frame, area, theme)
            });
    }

    fn handle_message(&mut self, message: &Message) -> Option<Message> {
        if self.panel.handle_message(message) || !self.panel.is_live() {
            return None;
        }
        if let Message::Key(key) = message {
            if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('r') {
                self.reload();
            }
        }
        None
    }

    fn reset(&mut self) {
        self.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    const LATENCY: Duration = Duration::from_millis(1000);

    fn press(c: char) -> Message {
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_fixture_parses_and_is_limited() {
        let posts = fetch_posts().expect("fixture parses");
        assert_eq!(posts.len(), POST_LIMIT);
        assert_eq!(posts[0].id, 1);
    }

    #[test]
    fn test_focus_outside_runtime_does_not_fetch() {
        let mut page = PostsPage::new(4, LATENCY, &MessageBus::default()).expect("page");
        page.focus();
        assert!(page.state().is_loading());
        assert!(!page.requested);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loads_once_on_focus() {
        let bus = MessageBus::default();
        let mut rx = bus.subscribe();
        let mut page = PostsPage::new(4, LATENCY, &bus).expect("page");
        page.focus();
        assert!(page.state().is_loading());

        tokio::time::sleep(LATENCY * 2).await;
        let state = page.state();
        assert_eq!(state.ready().map(Vec::len), Some(POST_LIMIT));
        assert_eq!(rx.try_recv().expect("redraw"), Message::Redraw);

        page.blur();
        page.focus();
        assert!(!page.state().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_r_reloads() {
        let mut page = PostsPage::new(4, LATENCY, &MessageBus::default()).expect("page");
        page.focus();
        tokio::time::sleep(LATENCY * 2).await;
        assert!(page.state().ready().is_some());

        page.handle_message(&press('r'));
        assert!(page.state().is_loading());
        tokio::time::sleep(LATENCY * 2).await;
        assert!(page.state().ready().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_fetches_again() {
        let mut page = PostsPage::new(4, LATENCY, &MessageBus::default()).expect("page");
        page.focus();
        tokio::time::sleep(LATENCY * 2).await;
        assert!(page.state().ready().is_some());

        page.reset();
        assert!(page.state().is_loading());
        tokio::time::sleep(LATENCY * 2).await;
        assert_eq!(page.state().ready().map(Vec::len), Some(POST_LIMIT));
    }
}
