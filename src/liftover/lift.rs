//! Tree liftover.
//!
//! Every leaf is remapped through its accession ID; containers are rebuilt
//! from the children that survive:
//!
//! | Node | 0 survivors | 1 survivor | 2+ survivors |
//! |------|-------------|------------|--------------|
//! | `/`, `~`, `^`, `\|` | dropped | that child | same operator |
//! | `+` | dropped | dropped (or that child, see [`GenotypePolicy`]) | genotype |
//!
//! Surviving siblings keep their order. The walk never fails: a locus that
//! cannot be found is simply dropped and recorded as a [`LiftoverEvent`].
//! When a genotype is dropped, loci inside it that did map are reported as
//! `DroppedWithGenotype` rather than `Renamed`.

use log::debug;

use super::policy::{DuplicatePolicy, GenotypePolicy, LiftoverConfig};
use super::report::LiftoverEvent;
use crate::gl::{GlNode, Locus, Members};
use crate::history::{AlleleHistoryIndex, DbVersion};

/// Lift a tree with the default policies.
///
/// Returns `None` when nothing representable remains at `target`.
pub fn lift_node(
    node: &GlNode,
    source: DbVersion,
    target: DbVersion,
    index: &AlleleHistoryIndex,
) -> Option<GlNode> {
    Lifter::new(index, source, target).lift(node)
}

/// Stateful walker that records an event per locus.
#[derive(Debug)]
pub struct Lifter<'a> {
    index: &'a AlleleHistoryIndex,
    source: DbVersion,
    target: DbVersion,
    config: LiftoverConfig,
    events: Vec<LiftoverEvent>,
}

impl<'a> Lifter<'a> {
    pub fn new(index: &'a AlleleHistoryIndex, source: DbVersion, target: DbVersion) -> Self {
        Self {
            index,
            source,
            target,
            config: LiftoverConfig::default(),
            events: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: LiftoverConfig) -> Self {
        self.config = config;
        self
    }

    /// Events recorded so far, in source order
    pub fn events(&self) -> &[LiftoverEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<LiftoverEvent> {
        self.events
    }

    pub fn lift(&mut self, node: &GlNode) -> Option<GlNode> {
        match node {
            GlNode::Locus(locus) => self.lift_locus(locus).map(GlNode::Locus),
            GlNode::AmbiguousAllele(loci) => self.lift_alleles(loci),
            GlNode::Genotype(first, second) => {
                let start = self.events.len();
                // Both sides are walked so every locus gets an event
                let first = self.lift(first);
                let second = self.lift(second);
                match (first, second) {
                    (Some(a), Some(b)) => Some(GlNode::Genotype(Box::new(a), Box::new(b))),
                    (Some(survivor), None) | (None, Some(survivor))
                        if self.config.genotype == GenotypePolicy::Degenerate =>
                    {
                        Some(survivor)
                    }
                    _ => {
                        self.drop_genotype(node, start);
                        None
                    }
                }
            }
            GlNode::Haplotype(children) => {
                let survivors = self.lift_all(children);
                rebuild(survivors, GlNode::Haplotype)
            }
            GlNode::MultilocusUnphasedGenotype(children) => {
                let survivors = self.lift_all(children);
                rebuild(survivors, GlNode::MultilocusUnphasedGenotype)
            }
            GlNode::GenotypeList(children) => {
                let survivors = self.lift_all(children);
                rebuild(survivors, GlNode::GenotypeList)
            }
        }
    }

    fn lift_all(&mut self, children: &Members<GlNode>) -> Vec<GlNode> {
        children
            .iter()
            .filter_map(|child| self.lift(child))
            .collect()
    }

    /// Rewrite the events recorded since `start` so every locus of a dropped
    /// genotype carries a drop event. Loci that mapped fine lose their
    /// `Renamed` or `Collapsed` event in favour of `DroppedWithGenotype`.
    fn drop_genotype(&mut self, genotype: &GlNode, start: usize) {
        let drops: Vec<LiftoverEvent> = self
            .events
            .drain(start..)
            .filter(LiftoverEvent::is_drop)
            .collect();
        let mut drops = drops.into_iter().peekable();

        for locus in genotype.loci() {
            match drops.next_if(|event| event.locus() == locus.name()) {
                Some(event) => self.events.push(event),
                None => {
                    debug!("{} dropped with its genotype", locus);
                    self.events.push(LiftoverEvent::DroppedWithGenotype {
                        locus: locus.name().to_string(),
                    });
                }
            }
        }
    }

    fn lift_alleles(&mut self, loci: &Members<Locus>) -> Option<GlNode> {
        let mut survivors: Vec<Locus> = Vec::with_capacity(loci.len());
        for locus in loci {
            let Some(lifted) = self.lift_locus(locus) else {
                continue;
            };
            if self.config.duplicates == DuplicatePolicy::Collapse && survivors.contains(&lifted) {
                debug!("{} collapsed into an earlier {}", locus, lifted);
                self.events.push(LiftoverEvent::Collapsed {
                    locus: locus.name().to_string(),
                });
                continue;
            }
            survivors.push(lifted);
        }

        let members = Members::new(survivors)?;
        if members.len() == 1 {
            return members.into_vec().pop().map(GlNode::Locus);
        }
        Some(GlNode::AmbiguousAllele(members))
    }

    fn lift_locus(&mut self, locus: &Locus) -> Option<Locus> {
        let Some(id) = self.index.lookup_id(self.source, locus.allele()) else {
            debug!("{} not found at {}, dropping", locus, self.source);
            self.events.push(LiftoverEvent::DroppedAtSource {
                locus: locus.name().to_string(),
            });
            return None;
        };

        let Some(name) = self.index.lookup_name(id, self.target) else {
            debug!("{} ({}) has no name at {}, dropping", locus, id, self.target);
            self.events.push(LiftoverEvent::DroppedAtTarget {
                locus: locus.name().to_string(),
                id: id.clone(),
            });
            return None;
        };

        let lifted = locus.renamed(name);
        if lifted != *locus {
            debug!("{} ({}) renamed to {}", locus, id, lifted);
            self.events.push(LiftoverEvent::Renamed {
                from: locus.name().to_string(),
                to: lifted.name().to_string(),
                id: id.clone(),
            });
        }
        Some(lifted)
    }
}

/// Collapse a survivor list: none, a lone child, or the rebuilt container
fn rebuild(survivors: Vec<GlNode>, wrap: fn(Members<GlNode>) -> GlNode) -> Option<GlNode> {
    let members = Members::new(survivors)?;
    if members.len() == 1 {
        return members.into_vec().pop();
    }
    Some(wrap(members))
}
