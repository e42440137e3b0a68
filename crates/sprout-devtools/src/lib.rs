use std::fmt::Write as _;

use web_time::Instant;

use sprout_core::{Dom, LiveNode, NodeId, PassStats, Renderer};

/// One-line render summary, refreshed once per inspected frame.
pub struct Hud {
    frame_count: u64,
    last_frame: Option<Instant>,
    last_passes: u64,
    rate_smooth: f32,
    pub stats: Option<PassStats>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_frame: None,
            last_passes: 0,
            rate_smooth: 0.0,
            stats: None,
        }
    }

    /// Takes a new stats sample and updates the passes-per-second estimate.
    pub fn record(&mut self, stats: PassStats) {
        self.frame_count += 1;
        let now = Instant::now();
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let rate = stats.passes.saturating_sub(self.last_passes) as f32 / dt;
                // simple EMA
                let a = 0.2;
                self.rate_smooth = if self.rate_smooth == 0.0 {
                    rate
                } else {
                    (1.0 - a) * self.rate_smooth + a * rate
                };
            }
        }
        self.last_passes = stats.passes;
        self.stats = Some(stats);
    }

    pub fn line(stats: &PassStats) -> String {
        format!(
            "passes: {}  |  build+commit: {:.2} ms  |  nodes: {}",
            stats.passes,
            stats.last_pass.as_secs_f64() * 1000.0,
            stats.live_nodes
        )
    }

    /// The stats line of the latest sample plus frame count and pass rate.
    pub fn overlay(&self) -> String {
        let mut lines = vec![
            format!("frame: {}", self.frame_count),
            format!("passes/s: {:.1}", self.rate_smooth),
        ];
        if let Some(stats) = &self.stats {
            lines.push(Self::line(stats));
        }
        lines.join("  |  ")
    }
}

pub struct Inspector {
    pub hud: Hud,
    pub enabled: bool,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            hud: Hud::new(),
            enabled: false,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// HUD line followed by the tree outline, or `None` while disabled.
    pub fn frame(&mut self, renderer: &Renderer) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.hud.record(renderer.stats());
        let report = format!(
            "{}\n{}",
            self.hud.overlay(),
            Self::dump(renderer.dom(), renderer.container())
        );
        log::debug!("inspector:\n{report}");
        Some(report)
    }

    /// Indented outline of the live tree under (and including) `root`.
    ///
    /// Elements print as `tag attr="value" @listener`, with `[focused]` and
    /// `[composing]` markers; text nodes print quoted.
    pub fn dump(dom: &Dom, root: NodeId) -> String {
        let mut lines = Vec::new();
        let active = dom.active_element();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some((line, children)) = dom.with_node(id, |node| describe(node, active == Some(id)))
            else {
                continue;
            };
            lines.push(format!("{}{line}", "  ".repeat(depth)));
            stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
        }
        lines.join("\n")
    }
}

fn describe(node: &LiveNode, focused: bool) -> (String, Vec<NodeId>) {
    match node {
        LiveNode::Text(text) => (format!("{text:?}"), Vec::new()),
        LiveNode::Element(el) => {
            let mut line = el.tag().to_owned();
            if !el.class_name().is_empty() {
                let _ = write!(line, " class={:?}", el.class_name());
            }
            for (name, value) in el.attributes() {
                let _ = write!(line, " {name}={value:?}");
            }
            for listener in el.listener_names() {
                let _ = write!(line, " @{listener}");
            }
            if focused {
                line.push_str(" [focused]");
            }
            if el.is_composing() {
                line.push_str(" [composing]");
            }
            (line, el.children().to_vec())
        }
    }
}
