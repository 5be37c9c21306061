// Dweve ScopeSAX - Scoped Event-Driven XML Parsing
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Matching child elements against a content model, one element at a time.
//!
//! Every particle of the model gets a [`ParticleState`] counting its
//! occurrences; a group additionally tracks where it is inside its current
//! occurrence (the position in a sequence, the chosen branch of a choice,
//! the members already seen in an `xs:all`). Schemas obey the unique
//! particle attribution rule, so the first particle that accepts an element
//! is the only one that could, and no backtracking is needed.

use super::{Compositor, ModelGroup, Particle, Term};
use crate::event::QualifiedName;

/// Progress through one particle.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParticleState {
    /// Occurrences started so far
    count: usize,
    /// Progress inside the current occurrence of a group
    current: Option<GroupState>,
}

#[derive(Debug, Clone)]
struct GroupState {
    /// Last sequence member matched, or the chosen branch of a choice
    cursor: Option<usize>,
    members: Vec<ParticleState>,
}

impl ParticleState {
    /// Feed the next child element.
    ///
    /// Returns the term that matched it. When nothing does, the state is
    /// left exactly as it was.
    pub(crate) fn accept<'s>(&mut self, particle: &'s Particle, name: &QualifiedName) -> Option<&'s Term> {
        let room = particle.max_occurs.map_or(true, |max| self.count < max);
        match &particle.term {
            Term::Group(group) => {
                if let Some(current) = self.current.as_mut() {
                    if let Some(term) = current.accept(group, name) {
                        return Some(term);
                    }
                    if !current.satisfied(group) {
                        return None;
                    }
                }
                if !room {
                    return None;
                }
                let mut next = GroupState::new(group);
                let term = next.accept(group, name)?;
                self.count += 1;
                self.current = Some(next);
                Some(term)
            }
            leaf => {
                if room && leaf.matches(name) {
                    self.count += 1;
                    Some(leaf)
                } else {
                    None
                }
            }
        }
    }

    /// Whether the content may end here.
    pub(crate) fn satisfied(&self, particle: &Particle) -> bool {
        let current_done = match (&self.current, &particle.term) {
            (Some(current), Term::Group(group)) => current.satisfied(group),
            _ => true,
        };
        current_done && (self.count >= particle.min_occurs || particle.term.emptiable())
    }

    /// Names of the elements that could come next, in model order.
    pub(crate) fn expected(&self, particle: &Particle) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_expected(particle, &mut out);
        out
    }

    /// Why the content cannot end here, or `None` when it can.
    pub(crate) fn missing(&self, particle: &Particle) -> Option<String> {
        if self.satisfied(particle) {
            return None;
        }
        match &particle.term {
            Term::Group(group) => match &self.current {
                Some(current) if !current.satisfied(group) => current.missing(group),
                Some(_) => Some(cardinality_message(
                    particle.term.label(),
                    particle.min_occurs,
                    particle.max_occurs,
                    self.count,
                )),
                None => GroupState::new(group).missing(group),
            },
            leaf => Some(cardinality_message(
                leaf.label(),
                particle.min_occurs,
                particle.max_occurs,
                self.count,
            )),
        }
    }

    fn collect_expected(&self, particle: &Particle, out: &mut Vec<String>) {
        let room = particle.max_occurs.map_or(true, |max| self.count < max);
        match &particle.term {
            Term::Group(group) => {
                if let Some(current) = &self.current {
                    current.collect_expected(group, out);
                    if !current.satisfied(group) {
                        return;
                    }
                }
                if room {
                    GroupState::new(group).collect_expected(group, out);
                }
            }
            leaf => {
                let label = leaf.label();
                if room && !out.iter().any(|seen| seen == label) {
                    out.push(label.to_string());
                }
            }
        }
    }
}

impl GroupState {
    fn new(group: &ModelGroup) -> Self {
        Self {
            cursor: None,
            members: vec![ParticleState::default(); group.particles.len()],
        }
    }

    fn accept<'s>(&mut self, group: &'s ModelGroup, name: &QualifiedName) -> Option<&'s Term> {
        match group.compositor {
            Compositor::Sequence => {
                let start = self.cursor.unwrap_or(0);
                for index in start..group.particles.len() {
                    let particle = &group.particles[index];
                    if let Some(term) = self.members[index].accept(particle, name) {
                        self.cursor = Some(index);
                        return Some(term);
                    }
                    // A required member cannot be skipped.
                    if !self.members[index].satisfied(particle) {
                        return None;
                    }
                }
                None
            }
            Compositor::Choice => match self.cursor {
                Some(index) => self.members[index].accept(&group.particles[index], name),
                None => {
                    for (index, particle) in group.particles.iter().enumerate() {
                        if let Some(term) = self.members[index].accept(particle, name) {
                            self.cursor = Some(index);
                            return Some(term);
                        }
                    }
                    None
                }
            },
            Compositor::All => group
                .particles
                .iter()
                .zip(self.members.iter_mut())
                .find_map(|(particle, state)| state.accept(particle, name)),
        }
    }

    fn satisfied(&self, group: &ModelGroup) -> bool {
        let mut pairs = group.particles.iter().zip(&self.members);
        match group.compositor {
            Compositor::Sequence => pairs
                .skip(self.cursor.unwrap_or(0))
                .all(|(particle, state)| state.satisfied(particle)),
            Compositor::Choice => match self.cursor {
                Some(index) => self.members[index].satisfied(&group.particles[index]),
                None => pairs.any(|(particle, state)| state.satisfied(particle)),
            },
            Compositor::All => pairs.all(|(particle, state)| state.satisfied(particle)),
        }
    }

    fn collect_expected(&self, group: &ModelGroup, out: &mut Vec<String>) {
        let pairs = group.particles.iter().zip(&self.members);
        match (group.compositor, self.cursor) {
            (Compositor::Sequence, cursor) => {
                for (particle, state) in pairs.skip(cursor.unwrap_or(0)) {
                    state.collect_expected(particle, out);
                    if !state.satisfied(particle) {
                        break;
                    }
                }
            }
            (Compositor::Choice, Some(index)) => {
                self.members[index].collect_expected(&group.particles[index], out);
            }
            (Compositor::Choice, None) | (Compositor::All, _) => {
                for (particle, state) in pairs {
                    state.collect_expected(particle, out);
                }
            }
        }
    }

    fn missing(&self, group: &ModelGroup) -> Option<String> {
        match (group.compositor, self.cursor) {
            (Compositor::Choice, Some(index)) => {
                self.members[index].missing(&group.particles[index])
            }
            (Compositor::Choice, None) => {
                let mut options = Vec::new();
                self.collect_expected(group, &mut options);
                let options: Vec<String> = options.iter().map(|o| format!("'{}'", o)).collect();
                Some(format!("Missing one of {}", options.join(", ")))
            }
            (Compositor::Sequence, cursor) => group
                .particles
                .iter()
                .zip(&self.members)
                .skip(cursor.unwrap_or(0))
                .find_map(|(particle, state)| state.missing(particle)),
            (Compositor::All, _) => group
                .particles
                .iter()
                .zip(&self.members)
                .find_map(|(particle, state)| state.missing(particle)),
        }
    }
}

pub(crate) fn cardinality_message(label: &str, min: usize, max: Option<usize>, found: usize) -> String {
    let max = max.map_or_else(|| "unbounded".to_string(), |m| m.to_string());
    format!(
        "Cardinality error for '{}': expected {}..{}, found {}",
        label, min, max, found
    )
}
