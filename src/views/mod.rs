pub(crate) mod cards;
pub(crate) mod editor;
pub(crate) mod hud;
