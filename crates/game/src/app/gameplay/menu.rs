const MENU_TITLE: &str = "SIEGE";
const MENU_OPTIONS_TOP: f32 = 280.0;
const MENU_OPTION_SPACING: f32 = 50.0;
const MENU_HIGHLIGHT: Color = Color::rgb(1.0, 1.0, 0.0);
const MENU_DISABLED: Color = Color::rgb(0.5, 0.5, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    NewGame,
    LoadGame,
    Quit,
}

impl MenuOption {
    const ALL: [MenuOption; 3] = [Self::NewGame, Self::LoadGame, Self::Quit];

    fn label(self) -> &'static str {
        match self {
            Self::NewGame => "New Game",
            Self::LoadGame => "Load Game",
            Self::Quit => "Quit",
        }
    }
}

/// Start-of-session overlay. While it is active the gameplay orchestrator does nothing.
#[derive(Debug, Clone)]
struct MainMenu {
    active: bool,
    selected: usize,
    has_save: bool,
}

impl MainMenu {
    fn new(has_save: bool) -> Self {
        Self {
            active: true,
            selected: 0,
            has_save,
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn selected(&self) -> MenuOption {
        MenuOption::ALL[self.selected]
    }

    fn is_enabled(&self, option: MenuOption) -> bool {
        option != MenuOption::LoadGame || self.has_save
    }

    /// Up/down wrap around and skip a disabled Load; Enter returns the highlighted option.
    fn handle_input(&mut self, input: &InputSnapshot) -> Option<MenuOption> {
        if !self.active {
            return None;
        }
        if input.was_pressed(InputAction::MoveUp) {
            self.step(MenuOption::ALL.len() - 1);
        }
        if input.was_pressed(InputAction::MoveDown) {
            self.step(1);
        }
        input
            .was_pressed(InputAction::Confirm)
            .then(|| self.selected())
    }

    fn step(&mut self, offset: usize) {
        let count = MenuOption::ALL.len();
        loop {
            self.selected = (self.selected + offset) % count;
            if self.is_enabled(self.selected()) {
                break;
            }
        }
    }
}

impl Component for MainMenu {
    fn render(&self, _owner: &Entity, renderer: &mut dyn Renderer) {
        if !self.active {
            return;
        }
        renderer.draw_rect(0.0, 0.0, 1100.0, 600.0, Color::rgba(0.0, 0.0, 0.0, 0.8));
        renderer.draw_text(MENU_TITLE, 450.0, 200.0, MENU_HIGHLIGHT);

        for (index, option) in MenuOption::ALL.into_iter().enumerate() {
            let y = MENU_OPTIONS_TOP + index as f32 * MENU_OPTION_SPACING;
            if !self.is_enabled(option) {
                let text = format!("{} (no save)", option.label());
                renderer.draw_text(&text, 510.0, y, MENU_DISABLED);
            } else if index == self.selected {
                let text = format!("> {} <", option.label());
                renderer.draw_text(&text, 490.0, y, MENU_HIGHLIGHT);
            } else {
                renderer.draw_text(option.label(), 510.0, y, Color::WHITE);
            }
        }
        renderer.draw_text("W/S to choose, Enter to confirm", 430.0, 450.0, Color::WHITE);
    }
}
