use asterism_core::{
    events::Event, Asterism, Depth, GraphData, Highlight, Selection, Sentiment,
};
use crossbeam::channel::{unbounded, Receiver};
use egui::{
    Align2, Color32, Context, FontId, Key, Pos2, Rect, Response, Sense, Stroke, TextEdit, Ui, Vec2,
};
use instant::{Duration, Instant};
use log::warn;

const DATASET: &str = include_str!("../assets/books.json");

const TOAST_DURATION: Duration = Duration::from_millis(2500);
const EDGE_HIT_TOLERANCE: f32 = 8.;

const COLOR_ACCENT: Color32 = Color32::from_rgb(128, 128, 255);
const COLOR_NEIGHBOR: Color32 = Color32::from_rgb(90, 90, 160);
const COLOR_DIMMED: Color32 = Color32::from_rgb(60, 60, 70);
const COLOR_RECOMMENDED: Color32 = Color32::from_rgb(96, 160, 96);
const COLOR_CRITIQUED: Color32 = Color32::from_rgb(176, 96, 96);
const COLOR_NEUTRAL: Color32 = Color32::GRAY;

pub struct App {
    core: Asterism,
    events: Receiver<Event>,

    search: String,
    depth: Depth,
    toast: Option<(String, Instant)>,
}

impl App {
    pub fn new() -> Self {
        let (sender, events) = unbounded();
        let mut core =
            Asterism::new(Rect::from_min_size(Pos2::ZERO, Vec2::new(800., 600.)))
                .with_event_sink(sender);

        let data: GraphData = serde_json::from_str(DATASET).expect("bundled dataset is valid");
        core.load_graph(data);

        for e in core.graph().dropped_edges() {
            warn!(
                "dropped citation {}: endpoint missing ({} -> {})",
                e.id, e.source_id, e.target_id
            );
        }

        Self {
            core,
            events,
            search: String::new(),
            depth: Depth::Limited(2),
            toast: None,
        }
    }

    pub fn update(&mut self, ctx: &Context, ui: &mut Ui) {
        self.draw_toolbar(ui);
        self.draw_graph(ui);
        self.drain_events();
        self.draw_toast(ctx);

        ctx.request_repaint();
    }

    fn draw_toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.search).hint_text("search by book title"),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

            egui::ComboBox::from_id_salt("depth")
                .selected_text(depth_label(self.depth))
                .show_ui(ui, |ui| {
                    for option in [
                        Depth::Limited(1),
                        Depth::Limited(2),
                        Depth::Limited(3),
                        Depth::All,
                    ] {
                        ui.selectable_value(&mut self.depth, option, depth_label(option));
                    }
                });

            if (submitted || ui.button("search").clicked()) && !self.search.is_empty() {
                self.core.filter_by_root(&self.search, self.depth);
            }

            if ui.button("reset").clicked() {
                self.search.clear();
                self.core.reset_view();
            }
        });
    }

    fn draw_graph(&mut self, ui: &mut Ui) {
        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        self.core
            .set_viewport(Rect::from_min_size(Pos2::ZERO, resp.rect.size()));

        self.handle_interactions(&resp);
        self.core.tick();

        let transform = self.core.transform();
        let origin = resp.rect.left_top().to_vec2();
        let to_screen = |p: Pos2| transform.canvas_to_screen_pos(p) + origin;

        for e in self.core.graph().edges_iter() {
            let (Some(a), Some(b)) = (
                self.core.graph().node(e.source_id()),
                self.core.graph().node(e.target_id()),
            ) else {
                continue;
            };

            let color = edge_color(e.highlight(), e.sentiment());
            let width = if e.highlight() == Highlight::Active {
                2.5
            } else {
                1.
            };
            let (start, end) = (to_screen(a.location()), to_screen(b.location()));
            painter.line_segment([start, end], Stroke::new(width, color));

            if self.core.selection() == Selection::Edge(e.id()) {
                let mid = start + (end - start) / 2.;
                painter.text(
                    mid - Vec2::new(0., 8.),
                    Align2::CENTER_BOTTOM,
                    e.quote(),
                    FontId::proportional(12.),
                    COLOR_ACCENT,
                );
            }
        }

        for n in self.core.graph().nodes_iter() {
            let pos = to_screen(n.location());
            let radius = transform.canvas_to_screen_size(n.radius());
            painter.circle_filled(pos, radius, node_color(n.highlight()));

            if matches!(n.highlight(), Highlight::Active | Highlight::Neighbor) {
                painter.text(
                    pos + Vec2::new(0., radius + 4.),
                    Align2::CENTER_TOP,
                    n.title(),
                    FontId::proportional(12.),
                    Color32::WHITE,
                );
            }
        }
    }

    fn handle_interactions(&mut self, resp: &Response) {
        let transform = self.core.transform();
        let to_canvas =
            |p: Pos2| transform.screen_to_canvas_pos((p - resp.rect.left_top()).to_pos2());

        if resp.drag_started() {
            if let Some(pos) = resp.interact_pointer_pos() {
                if let Some(id) = self.core.graph().node_at(to_canvas(pos)) {
                    self.core.begin_drag(id);
                }
            }
        }
        if resp.dragged() {
            if let Some(pos) = resp.interact_pointer_pos() {
                self.core.drag_to(to_canvas(pos));
            }
        }
        if resp.drag_stopped() {
            self.core.end_drag();
        }

        if resp.clicked() {
            if let Some(pos) = resp.interact_pointer_pos() {
                let canvas = to_canvas(pos);
                if let Some(id) = self.core.graph().node_at(canvas) {
                    self.core.select_node(id);
                } else if let Some(id) = self
                    .core
                    .graph()
                    .edge_at(canvas, EDGE_HIT_TOLERANCE / transform.zoom)
                {
                    self.core.select_edge(id);
                } else {
                    self.core.clear_selection();
                }
            }
        }
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            if let Event::SearchNotFound(p) = event {
                self.toast = Some((format!("no book titled \"{}\"", p.query), Instant::now()));
            }
        }
    }

    fn draw_toast(&mut self, ctx: &Context) {
        let Some((message, shown_at)) = &self.toast else {
            return;
        };
        if shown_at.elapsed() > TOAST_DURATION {
            self.toast = None;
            return;
        }

        egui::Area::new(egui::Id::new("search_toast"))
            .anchor(Align2::CENTER_TOP, Vec2::new(0., 32.))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(COLOR_CRITIQUED, message);
                });
            });
    }
}

fn depth_label(depth: Depth) -> String {
    match depth {
        Depth::Limited(n) => format!("{n} degrees"),
        Depth::All => "all degrees".to_string(),
    }
}

fn node_color(highlight: Highlight) -> Color32 {
    match highlight {
        Highlight::Neutral => COLOR_NEUTRAL,
        Highlight::Active => COLOR_ACCENT,
        Highlight::Neighbor => COLOR_NEIGHBOR,
        Highlight::Dimmed => COLOR_DIMMED,
    }
}

fn edge_color(highlight: Highlight, sentiment: Sentiment) -> Color32 {
    match highlight {
        Highlight::Active => COLOR_ACCENT,
        Highlight::Neighbor => COLOR_NEIGHBOR,
        Highlight::Dimmed => COLOR_DIMMED,
        Highlight::Neutral => match sentiment {
            Sentiment::Recommended => COLOR_RECOMMENDED,
            Sentiment::Critiqued => COLOR_CRITIQUED,
            Sentiment::Neutral => COLOR_NEUTRAL,
        },
    }
}
