use eframe::egui::{self, Context as EguiContext, Key, TopBottomPanel};
use eframe::{App, Frame};
use log::{info, warn};

use blackboard::{BoardState, ToolMode, UserSettings};

use crate::action_bar;
use crate::canvas::CanvasView;
use crate::theme;
use crate::toolbar;
use crate::ui_controls;

pub struct BlackboardApp {
    state: BoardState,
    canvas: CanvasView,
    settings: UserSettings,
    theme: theme::AppTheme,
}

impl BlackboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = theme::chalk_theme();
        theme::apply_theme(&cc.egui_ctx, &theme);

        let settings = UserSettings::load().unwrap_or_else(|err| {
            info!("using default settings: {err:#}");
            UserSettings::default()
        });

        Self {
            state: BoardState::new(&settings),
            canvas: CanvasView::new(settings.show_dot_grid),
            settings,
            theme,
        }
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        let cmd = ctx.input(|input| input.modifiers.command || input.modifiers.ctrl);

        if ctx.wants_keyboard_input() {
            if ctx.input(|input| input.key_pressed(Key::Escape)) {
                ctx.memory_mut(|memory| memory.stop_text_input());
            }
            return;
        }

        if cmd {
            if ctx.input(|input| input.key_pressed(Key::Z)) {
                self.state.undo_last();
            }
            if ctx.input(|input| input.key_pressed(Key::Plus) || input.key_pressed(Key::Equals)) {
                self.state.zoom_in(self.canvas.center());
            }
            if ctx.input(|input| input.key_pressed(Key::Minus)) {
                self.state.zoom_out(self.canvas.center());
            }
            if ctx.input(|input| input.key_pressed(Key::Num0)) {
                self.state.reset_view();
            }
            return;
        }

        if ctx.input(|input| input.key_pressed(Key::Escape) || input.key_pressed(Key::M)) {
            self.state.set_mode(ToolMode::Move);
        }
        if ctx.input(|input| input.key_pressed(Key::D)) {
            self.state.set_mode(ToolMode::Draw);
        }
        if ctx.input(|input| input.key_pressed(Key::N)) {
            self.state.set_mode(ToolMode::PlaceNote);
        }
        if ctx.input(|input| input.key_pressed(Key::G)) {
            self.canvas.show_dot_grid = !self.canvas.show_dot_grid;
        }
    }

    /// Writes the tool preferences back to disk when they changed this frame.
    fn persist_settings(&mut self) {
        let current = UserSettings {
            pencil_color: self.state.pencil_color(),
            note_color: self.state.note_color(),
            show_dot_grid: self.canvas.show_dot_grid,
        };
        if current == self.settings {
            return;
        }
        if let Err(err) = current.save() {
            warn!("cannot save settings: {err:#}");
        }
        self.settings = current;
    }
}

impl App for BlackboardApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        self.handle_shortcuts(ctx);

        TopBottomPanel::top("toolbar")
            .exact_height(self.theme.layout.toolbar_height)
            .frame(ui_controls::toolbar_frame(&self.theme))
            .show(ctx, |ui| {
                let width_class = self.theme.width_class(ui.available_width());
                toolbar::show_toolbar(ui, &mut self.state, width_class);
            });

        let action_output = TopBottomPanel::bottom("action_bar")
            .exact_height(self.theme.layout.action_bar_height)
            .frame(ui_controls::action_bar_frame(&self.theme))
            .show(ctx, |ui| {
                let width_class = self.theme.width_class(ui.available_width());
                action_bar::show_action_bar(ui, &self.state, width_class)
            })
            .inner;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.surfaces.canvas_bg))
            .show(ctx, |ui| {
                self.canvas.show(ui, &mut self.state);
            });

        if action_output.undo {
            self.state.undo_last();
        }
        if action_output.zoom_in {
            self.state.zoom_in(self.canvas.center());
        }
        if action_output.zoom_out {
            self.state.zoom_out(self.canvas.center());
        }
        if action_output.reset_view {
            self.state.reset_view();
        }

        self.persist_settings();
    }
}
