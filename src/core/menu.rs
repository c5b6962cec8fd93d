//! Menu definitions and the arena that owns them.
//!
//! A [`MenuTree`] holds every [`MenuDef`] in a flat `Vec` and items refer to
//! child menus by [`MenuId`].  The tree is validated once when it is built
//! from its raw, sentinel-terminated form and is immutable afterwards, so
//! the navigator can borrow it freely.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::MenuError;

// ───────────────────────────────────────── actions ───────────

/// Opaque handle to a zero-argument callback bound to a leaf item.
#[derive(Clone)]
pub struct ActionHandle {
    name: Arc<str>,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl ActionHandle {
    pub fn new(name: &str, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            name: Arc::from(name),
            callback: Arc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self) {
        (self.callback)()
    }
}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionHandle").field(&self.name).finish()
    }
}

/// Named callbacks that leaf items can bind to when a tree is loaded.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionHandle>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`, replacing any previous binding.
    pub fn register(&mut self, name: &str, callback: impl Fn() + Send + Sync + 'static) {
        self.actions
            .insert(name.to_string(), ActionHandle::new(name, callback));
    }

    pub fn get(&self, name: &str) -> Option<&ActionHandle> {
        self.actions.get(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

// ───────────────────────────────────────── items ─────────────

/// Index into [`MenuTree::menus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Runs a callback when activated.
    Leaf,
    /// Opens a child menu.
    SubMenuLink,
    /// Shows a value; activation is reserved and currently inert.
    ValueDisplay,
    /// Behaves like the Back key.
    GoBack,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Leaf => "action",
            ItemKind::SubMenuLink => "link",
            ItemKind::ValueDisplay => "value",
            ItemKind::GoBack => "back",
        }
    }
}

/// What activating an item refers to.  Only the combinations listed on
/// [`MenuItem`] are ever constructed.
#[derive(Debug, Clone)]
pub enum ItemAction {
    None,
    Callback(ActionHandle),
    ChildMenu(MenuId),
}

/// A single selectable row.
///
/// `Leaf` carries `None` or `Callback`, `SubMenuLink` carries `None` or
/// `ChildMenu`, the other kinds always carry `None`.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub kind: ItemKind,
    pub action: ItemAction,
}

impl MenuItem {
    pub fn child(&self) -> Option<MenuId> {
        match self.action {
            ItemAction::ChildMenu(id) => Some(id),
            _ => None,
        }
    }

    pub fn callback(&self) -> Option<&ActionHandle> {
        match &self.action {
            ItemAction::Callback(handle) => Some(handle),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── menus ─────────────

/// An ordered, non-empty list of items.
#[derive(Debug, Clone)]
pub struct MenuDef {
    pub name: String,
    items: Vec<MenuItem>,
}

impl MenuDef {
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    /// Number of items, not counting the terminator.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// ───────────────────────────────────────── raw form ──────────

/// One entry of a menu as written by the author, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    Item {
        label: String,
        kind: ItemKind,
        /// Action name for `Leaf`, menu name for `SubMenuLink`.
        target: Option<String>,
    },
    /// Marks the end of the item list.
    Sentinel,
}

impl RawEntry {
    pub fn item(label: &str, kind: ItemKind, target: Option<&str>) -> Self {
        RawEntry::Item {
            label: label.to_string(),
            kind,
            target: target.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMenu {
    pub name: String,
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTree {
    /// Header shown while the root menu is active.
    pub title: Option<String>,
    /// Name of the root menu.  Defaults to the first menu.
    pub root: Option<String>,
    pub menus: Vec<RawMenu>,
}

// ───────────────────────────────────────── tree ──────────────

pub const DEFAULT_TITLE: &str = "Menu";

/// Validated, immutable forest of menus with one designated root.
#[derive(Debug, Clone)]
pub struct MenuTree {
    menus: Vec<MenuDef>,
    root: MenuId,
    title: String,
}

impl MenuTree {
    /// Validate `raw` and resolve every link and action name.
    pub fn from_raw(raw: RawTree, actions: &ActionRegistry) -> Result<Self, MenuError> {
        let mut ids: HashMap<&str, MenuId> = HashMap::new();
        for (i, menu) in raw.menus.iter().enumerate() {
            if ids.insert(menu.name.as_str(), MenuId(i)).is_some() {
                return Err(MenuError::malformed(&menu.name, "menu defined twice"));
            }
        }

        let root = match raw.root.as_deref() {
            Some(name) => *ids
                .get(name)
                .ok_or_else(|| MenuError::malformed(name, "root menu does not exist"))?,
            None if raw.menus.is_empty() => {
                return Err(MenuError::malformed("<root>", "no menus defined"));
            }
            None => MenuId(0),
        };

        let mut menus = Vec::with_capacity(raw.menus.len());
        for menu in &raw.menus {
            menus.push(resolve_menu(menu, &ids, actions)?);
        }

        let tree = Self {
            menus,
            root,
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        };
        tree.check_acyclic()?;
        Ok(tree)
    }

    pub fn root(&self) -> MenuId {
        self.root
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Panics on an id that did not come from this tree.
    pub fn menu(&self, id: MenuId) -> &MenuDef {
        &self.menus[id.0]
    }

    pub fn find(&self, name: &str) -> Option<MenuId> {
        self.menus.iter().position(|m| m.name == name).map(MenuId)
    }

    pub fn menus(&self) -> &[MenuDef] {
        &self.menus
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Longest chain of links reachable from the root, i.e. how many
    /// history frames a user can stack up.
    pub fn max_depth(&self) -> usize {
        let mut memo = vec![None; self.menus.len()];
        self.depth_from(self.root, &mut memo)
    }

    fn depth_from(&self, id: MenuId, memo: &mut [Option<usize>]) -> usize {
        if let Some(depth) = memo[id.0] {
            return depth;
        }
        let depth = self.menus[id.0]
            .items
            .iter()
            .filter_map(MenuItem::child)
            .map(|child| 1 + self.depth_from(child, memo))
            .max()
            .unwrap_or(0);
        memo[id.0] = Some(depth);
        depth
    }

    /// Depth-first search over links; meeting a menu that is still on the
    /// current path means a cycle.
    fn check_acyclic(&self) -> Result<(), MenuError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        fn visit(tree: &MenuTree, id: MenuId, marks: &mut [Mark]) -> Result<(), MenuError> {
            marks[id.0] = Mark::OnPath;
            for child in tree.menus[id.0].items.iter().filter_map(MenuItem::child) {
                match marks[child.0] {
                    Mark::OnPath => {
                        return Err(MenuError::malformed(
                            &tree.menus[id.0].name,
                            format!("link to `{}` forms a cycle", tree.menus[child.0].name),
                        ));
                    }
                    Mark::Unvisited => visit(tree, child, marks)?,
                    Mark::Done => {}
                }
            }
            marks[id.0] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.menus.len()];
        for i in 0..self.menus.len() {
            if marks[i] == Mark::Unvisited {
                visit(self, MenuId(i), &mut marks)?;
            }
        }
        Ok(())
    }
}

fn resolve_menu(
    menu: &RawMenu,
    ids: &HashMap<&str, MenuId>,
    actions: &ActionRegistry,
) -> Result<MenuDef, MenuError> {
    let Some(end) = menu.entries.iter().position(|e| *e == RawEntry::Sentinel) else {
        return Err(MenuError::malformed(&menu.name, "missing terminator"));
    };
    if end + 1 != menu.entries.len() {
        return Err(MenuError::malformed(&menu.name, "items after terminator"));
    }
    if end == 0 {
        return Err(MenuError::malformed(&menu.name, "menu has no items"));
    }

    let mut items = Vec::with_capacity(end);
    for entry in &menu.entries[..end] {
        let RawEntry::Item {
            label,
            kind,
            target,
        } = entry
        else {
            continue;
        };
        if label.trim().is_empty() {
            return Err(MenuError::malformed(&menu.name, "item with empty label"));
        }

        let action = match (kind, target.as_deref()) {
            (_, None) => ItemAction::None,
            (ItemKind::Leaf, Some(name)) => match actions.get(name) {
                Some(handle) => ItemAction::Callback(handle.clone()),
                None => {
                    return Err(MenuError::malformed(
                        &menu.name,
                        format!("`{label}` binds unknown action `{name}`"),
                    ));
                }
            },
            (ItemKind::SubMenuLink, Some(name)) => match ids.get(name) {
                Some(&id) => ItemAction::ChildMenu(id),
                None => {
                    return Err(MenuError::malformed(
                        &menu.name,
                        format!("`{label}` links to unknown menu `{name}`"),
                    ));
                }
            },
            (other, Some(_)) => {
                return Err(MenuError::malformed(
                    &menu.name,
                    format!("`{label}`: {} items take no target", other.label()),
                ));
            }
        };

        items.push(MenuItem {
            label: label.clone(),
            kind: *kind,
            action,
        });
    }

    Ok(MenuDef {
        name: menu.name.clone(),
        items,
    })
}
