//! Two ways to load the same posts, side by side in a two-pane panel:
//! loading state kept by hand around a fetch, or a resource read while
//! drawing.

use crossterm::event::{KeyCode, KeyEventKind};
use featuretour_core::{
    CoreResult, Message, MessageBus, Page, PageId, PanelTab, Resource, ResourceLoader,
    TabbedPanel, Theme,
};
use featuretour_ui::PanelView;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use std::time::Duration;

use crate::content::{hint_line, DemoPanel};
use crate::posts::{fetch_posts, Post};

/// Number of posts each approach loads
pub const COMPARISON_LIMIT: usize = 3;

const DESCRIPTION: &str = "\
The same data can be loaded in two styles.

The traditional pane keeps a loading flag and an error slot next to the
posts and updates them by hand around the fetch. Its button stays disabled
while a request runs and can be pressed again to reload.

The resource pane reads the posts straight from a resource. Until the value
resolves the view is suspended and a placeholder takes its place. The load
happens once; later presses reuse the resolved value.

Switch panes with the arrow keys or 1 and 2, and press Enter to load. Only
the selected pane is drawn. Each pane keeps its own data while hidden.";

/// Key of a comparison pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approach {
    /// Loading flag and error managed around the fetch
    Traditional,
    /// Value read from a resource while drawing
    Modern,
}

impl Approach {
    /// Label in the pane strip
    pub fn label(self) -> &'static str {
        match self {
            Approach::Traditional => "Traditional",
            Approach::Modern => "Resource",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Approach::Traditional => "Manual loading state",
            Approach::Modern => "Reading the resource",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Approach::Traditional => {
                "The page tracks the loading flag and the error itself and updates them around the fetch."
            }
            Approach::Modern => {
                "The view reads the resource directly and is replaced by a placeholder until it resolves."
            }
        }
    }
}

/// One side of the comparison with its own posts resource.
#[derive(Debug)]
pub struct ApproachPane {
    approach: Approach,
    loader: ResourceLoader<Vec<Post>>,
    requested: bool,
}

impl ApproachPane {
    fn new(approach: Approach, bus: &MessageBus) -> Self {
        let bus = bus.clone();
        ApproachPane {
            approach,
            loader: ResourceLoader::new().with_notifier(move || {
                let _ = bus.send(Message::Redraw);
            }),
            requested: false,
        }
    }

    /// State of the posts, or `None` before the first load
    pub fn state(&self) -> Option<Resource<Vec<Post>>> {
        self.requested.then(|| self.loader.state())
    }

    // Traditional: the button is disabled while loading. Modern: loads once.
    fn accepts_load(&self) -> bool {
        match self.approach {
            Approach::Traditional => !(self.requested && self.loader.state().is_loading()),
            Approach::Modern => !self.requested,
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut lines = vec![
            Line::styled(
                self.approach.heading(),
                theme.highlight().add_modifier(Modifier::BOLD),
            ),
            Line::styled(self.approach.summary(), theme.muted()),
            Line::default(),
        ];

        let state = self.state();
        match self.approach {
            Approach::Traditional => {
                let loading = state.as_ref().is_some_and(Resource::is_loading);
                let button = if loading { "[ Loading... ]" } else { "[ Load data ]" };
                lines.push(Line::styled(button, theme.base()));
                lines.push(Line::default());
            }
            Approach::Modern if state.is_none() => {
                lines.push(Line::styled("[ Load data ]", theme.base()));
            }
            Approach::Modern => {}
        }

        match state {
            None => {}
            Some(Resource::Loading) => {
                let placeholder = match self.approach {
                    Approach::Traditional => "Loading...",
                    Approach::Modern => "Suspended until the posts arrive...",
                };
                lines.push(Line::styled(
                    placeholder,
                    Style::default().fg(theme.colors.warning),
                ));
            }
            Some(Resource::Failed(message)) => {
                lines.push(Line::styled(message, Style::default().fg(theme.colors.error)));
            }
            Some(Resource::Ready(posts)) => {
                for post in &posts {
                    lines.push(Line::styled(post.title.clone(), theme.highlight()));
                    lines.push(Line::styled(format!("  {}", post.body), theme.base()));
                }
            }
        }

        frame.render_widget(
            Paragraph::new(lines)
                .style(theme.base())
                .wrap(Wrap { trim: false }),
            area,
        );
    }
}

/// Comparison page state
pub struct ApproachesPage {
    id: PageId,
    panel: DemoPanel,
    panes: TabbedPanel<Approach, ApproachPane>,
    latency: Duration,
}

impl ApproachesPage {
    /// Creates the page with the traditional pane selected.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn new(id: PageId, latency: Duration, bus: &MessageBus) -> CoreResult<Self> {
        let panes = TabbedPanel::new(
            [Approach::Traditional, Approach::Modern]
                .into_iter()
                .map(|approach| {
                    PanelTab::new(approach, approach.label(), ApproachPane::new(approach, bus))
                })
                .collect(),
        )?;
        Ok(ApproachesPage {
            id,
            panel: DemoPanel::new(DESCRIPTION, include_str!("approaches.rs"))?,
            panes,
            latency,
        })
    }

    /// Pane currently shown
    pub fn active_approach(&self) -> Approach {
        *self.panes.active_key()
    }

    /// The pane for `approach`, shown or not
    pub fn pane(&self, approach: Approach) -> Option<&ApproachPane> {
        self.panes.content(&approach)
    }

    fn load_active(&mut self) {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!("comparison load requested outside of a runtime");
            return;
        }
        let latency = self.latency;
        let pane = self.panes.active_content_mut();
        if !pane.accepts_load() {
            tracing::debug!(approach = ?pane.approach, "load ignored");
            return;
        }
        pane.requested = true;
        tracing::info!(approach = ?pane.approach, "loading posts");
        pane.loader.load(latency, || async {
            fetch_posts().map(|posts| posts.into_iter().take(COMPARISON_LIMIT).collect())
        });
    }

    fn view_example(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [panes, hints] =
            Layout::vertical([Constraint::Min(6), Constraint::Length(1)]).areas(area);
        PanelView::new(&self.panes, theme)
            .title("Approach")
            .render(frame, panes, |pane, frame, area| pane.view(frame, area, theme));
        frame.render_widget(
            hint_line(&[("\u{2190}/\u{2192}", "switch"), ("Enter", "load")], theme),
            hints,
        );
    }
}

impl Page for ApproachesPage {
    fn id(&self) -> PageId {
        self.id
    }

    fn title(&self) -> &str {
        "Loading approaches"
    }

    fn focus(&mut self) {}

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
        let Message::Key(key) = message else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Left => self.panes.select_prev(),
            KeyCode::Right => self.panes.select_next(),
            KeyCode::Char('1') => {
                self.panes.select(&Approach::Traditional);
            }
            KeyCode::Char('2') => {
                self.panes.select(&Approach::Modern);
            }
            KeyCode::Enter => self.load_active(),
            _ => {}
        }
        None
    }
}
