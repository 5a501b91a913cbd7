//! Named layout algorithms and their display groups.
//!
//! Algorithms and group labels live apart: a label is only a heading for
//! menus and can never be looked up or drawn as an algorithm.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashMap;

use crate::algorithms::{KatzCentrality, Louvain};
use crate::error::{LayoutError, Result};
use crate::layout::{
    CentralityLayout, CircularLayout, CommunityLayout, ForceAtlas2Layout, LayoutAlgorithm,
    RadialLayout, RandomLayout, SpectralLayout, SpringLayout, TwoLevelPlacement,
};
use crate::settings::LayoutSettings;

/// A labelled, ordered set of algorithm names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutGroup {
    pub label: &'static str,
    pub members: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    algorithms: HashMap<&'static str, LayoutAlgorithm>,
    groups: Vec<LayoutGroup>,
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::from_settings(&LayoutSettings::default())
    }
}

impl LayoutRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            algorithms: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// The standard algorithm set, configured from `settings`.
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        let placement = TwoLevelPlacement::new(settings.placement.clone());
        let mut registry = Self::empty();

        registry.insert("simple_layouts", LayoutAlgorithm::Random(RandomLayout));
        registry.insert("simple_layouts", LayoutAlgorithm::Circular(CircularLayout));
        registry.insert("simple_layouts", LayoutAlgorithm::Radial(RadialLayout::default()));
        registry.insert("spectral_layouts", LayoutAlgorithm::Spectral(SpectralLayout));
        registry.insert(
            "force_layouts",
            LayoutAlgorithm::Spring(SpringLayout::new(settings.spring.clone())),
        );
        registry.insert(
            "force_layouts",
            LayoutAlgorithm::ForceAtlas2(ForceAtlas2Layout::default()),
        );
        registry.insert(
            "cluster_layouts",
            LayoutAlgorithm::Community(CommunityLayout {
                detector: Louvain::new(settings.louvain.clone()),
                placement: placement.clone(),
            }),
        );
        registry.insert(
            "cluster_layouts",
            LayoutAlgorithm::Centrality(CentralityLayout {
                measure: KatzCentrality::new(settings.katz.clone()),
                bands: settings.centrality_bands,
                placement,
            }),
        );
        registry.groups.push(LayoutGroup {
            label: "exp",
            members: Vec::new(),
        });

        registry
    }

    /// Add `algorithm` under `group`, replacing any algorithm of the same name.
    ///
    /// Reserved variants cannot compute anything and are refused with
    /// [`LayoutError::NotImplemented`].
    pub fn register(&mut self, group: &'static str, algorithm: LayoutAlgorithm) -> Result<()> {
        if algorithm.is_reserved() {
            tracing::warn!(algorithm = algorithm.name(), "refusing reserved layout");
            return Err(LayoutError::NotImplemented {
                algorithm: algorithm.name(),
            });
        }
        self.insert(group, algorithm);
        Ok(())
    }

    fn insert(&mut self, group: &'static str, algorithm: LayoutAlgorithm) {
        let name = algorithm.name();
        for existing in &mut self.groups {
            existing.members.retain(|&member| member != name);
        }
        match self.groups.iter_mut().find(|g| g.label == group) {
            Some(existing) => existing.members.push(name),
            None => self.groups.push(LayoutGroup {
                label: group,
                members: vec![name],
            }),
        }
        self.algorithms.insert(name, algorithm);
    }

    pub fn get(&self, name: &str) -> Option<&LayoutAlgorithm> {
        self.algorithms.get(name)
    }

    /// Draw one registered algorithm uniformly. `None` only when empty.
    pub fn get_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<(&'static str, &LayoutAlgorithm)> {
        let names = self.names();
        let &name = names.choose(rng)?;
        self.algorithms.get(name).map(|algorithm| (name, algorithm))
    }

    pub fn groups(&self) -> &[LayoutGroup] {
        &self.groups
    }

    /// Registered algorithm names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.algorithms.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_default_groups() {
        let registry = LayoutRegistry::default();
        let labels: Vec<&str> = registry.groups().iter().map(|g| g.label).collect();
        assert_eq!(
            labels,
            vec!["simple_layouts", "spectral_layouts", "force_layouts", "cluster_layouts", "exp"]
        );
        assert_eq!(registry.groups()[0].members, vec!["random", "circular", "twopi"]);
        assert_eq!(registry.groups()[3].members, vec!["louvain", "katz_centrality"]);
        assert!(registry.groups()[4].members.is_empty());
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_group_labels_are_not_algorithms() {
        let registry = LayoutRegistry::default();
        for group in registry.groups() {
            assert!(registry.get(group.label).is_none(), "{} resolved", group.label);
        }
        assert!(registry.get("forceatlas2_gpu").is_none());
        assert!(registry.get("kmeans").is_none());
    }

    #[test]
    fn test_random_draws_only_real_algorithms() {
        let registry = LayoutRegistry::default();
        let labels: HashSet<&str> = registry.groups().iter().map(|g| g.label).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1000);
        let mut drawn = HashSet::new();

        for _ in 0..1000 {
            let (name, algorithm) = registry.get_random(&mut rng).unwrap();
            assert!(!labels.contains(name));
            assert_eq!(algorithm.name(), name);
            drawn.insert(name);
        }
        assert_eq!(drawn.len(), registry.len());
    }

    #[test]
    fn test_empty_registry_draws_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(LayoutRegistry::empty().get_random(&mut rng).is_none());
    }

    #[test]
    fn test_register_moves_between_groups() {
        let mut registry = LayoutRegistry::default();
        registry
            .register("exp", LayoutAlgorithm::Circular(CircularLayout))
            .unwrap();

        assert!(!registry.groups()[0].members.contains(&"circular"));
        assert_eq!(registry.groups()[4].members, vec!["circular"]);
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_reserved_layouts_are_refused() {
        let mut registry = LayoutRegistry::default();
        for reserved in [LayoutAlgorithm::KMeans, LayoutAlgorithm::ForceAtlas2Gpu] {
            let name = reserved.name();
            match registry.register("exp", reserved) {
                Err(LayoutError::NotImplemented { algorithm }) => assert_eq!(algorithm, name),
                other => panic!("expected NotImplemented, got {other:?}"),
            }
            assert!(registry.get(name).is_none());
        }
        assert!(registry.groups()[4].members.is_empty());
        assert_eq!(registry.len(), 8);
    }
}
