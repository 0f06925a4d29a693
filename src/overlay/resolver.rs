use super::{append_packages, apply_scalars, Overrides};
use crate::plan::Plan;

/// Where an override layer came from. Later variants have higher priority for
/// scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Environment,
    Cli,
}

impl LayerKind {
    /// Packages are unioned CLI-first, regardless of scalar priority.
    fn package_rank(self) -> u8 {
        match self {
            LayerKind::Cli => 0,
            LayerKind::Environment => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub overrides: Overrides,
}

impl Layer {
    pub fn new(kind: LayerKind, overrides: Overrides) -> Self {
        Self { kind, overrides }
    }
}

/// Applies a stack of override layers to a base plan.
///
/// ```
/// use dockplan::overlay::{LayerKind, OverlayResolver, Overrides};
/// use dockplan::plan::{Language, Plan};
///
/// let env = Overrides { start_command: Some("node a.js".into()), ..Default::default() };
/// let cli = Overrides { start_command: Some("node b.js".into()), ..Default::default() };
///
/// let plan = OverlayResolver::new()
///     .with_layer(LayerKind::Cli, cli)
///     .with_layer(LayerKind::Environment, env)
///     .resolve(Plan::new(Language::Node));
/// assert_eq!(plan.start_command, "node b.js");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverlayResolver {
    layers: Vec<Layer>,
}

impl OverlayResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, kind: LayerKind, overrides: Overrides) -> Self {
        self.push(Layer::new(kind, overrides));
        self
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Scalars go low to high priority (environment, then CLI); packages are
    /// appended CLI first, then environment. Layers of the same kind keep their
    /// insertion order.
    pub fn resolve(&self, plan: Plan) -> Plan {
        let mut by_priority: Vec<&Layer> = self.layers.iter().collect();
        by_priority.sort_by_key(|layer| layer.kind);
        let plan = by_priority
            .iter()
            .fold(plan, |plan, layer| apply_scalars(plan, &layer.overrides));

        let mut by_package_order: Vec<&Layer> = self.layers.iter().collect();
        by_package_order.sort_by_key(|layer| layer.kind.package_rank());
        by_package_order
            .iter()
            .fold(plan, |plan, layer| append_packages(plan, &layer.overrides.packages))
    }
}
