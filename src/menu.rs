use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Hidden,
    Visible,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Hidden => MenuState::Visible,
            MenuState::Visible => MenuState::Hidden,
        }
    }

    pub fn is_hidden(self) -> bool {
        self == MenuState::Hidden
    }

    /// Body class applied while the slide-out menu is closed.
    pub fn body_class(self) -> &'static str {
        match self {
            MenuState::Hidden => "menu-hidden",
            MenuState::Visible => "",
        }
    }
}

/// Owns the menu state. Renderers follow changes through [`subscribe`].
///
/// [`subscribe`]: MenuController::subscribe
pub struct MenuController {
    state: watch::Sender<MenuState>,
}

impl MenuController {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MenuState::Hidden);
        Self { state }
    }

    pub fn state(&self) -> MenuState {
        *self.state.borrow()
    }

    /// Flips the state once per call and returns the new state.
    pub fn toggle(&self) -> MenuState {
        self.state.send_modify(|state| *state = state.toggled());
        let state = self.state();
        tracing::debug!(?state, "Menu toggled");
        state
    }

    pub fn subscribe(&self) -> watch::Receiver<MenuState> {
        self.state.subscribe()
    }
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new()
    }
}
