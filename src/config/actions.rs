#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Menu,
    Help,
    Options,
    Login,
    Reload,
    NextTab,
    PrevTab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Toggle,
    Exit,
    NextColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    SortNext,
    SortPrev,
    SortReverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Add,
    Edit,
    Delete,
    Increment,
    Decrement,
    Copy,
    OpenLink,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAction {
    Add,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomAction {
    Add,
    Edit,
    Delete,
    Make,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerAction {
    Clear,
    Copy,
    Follow,
    LevelUp,
    LevelDown,
}
