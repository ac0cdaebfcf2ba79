// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One federation execution inside the loopback RTI.

use super::callback::{Callback, Outbox};
use crate::handle::{
    AttributeHandle, FederateHandle, InteractionClassHandle, ObjectClassHandle,
    ObjectInstanceHandle,
};
use crate::rti::{
    AttributeValueMap, LogicalTime, ParameterValueMap, RtiException, RtiResult,
    SyncPointFailureReason,
};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug)]
pub(crate) struct Member {
    pub(crate) conn: u64,
    pub(crate) name: String,
    time: LogicalTime,
    /// Requested time while in the time-advancing state.
    pending: Option<LogicalTime>,
    lookahead: f64,
    regulating: bool,
    constrained: bool,
    object_pubs: HashMap<ObjectClassHandle, HashSet<AttributeHandle>>,
    object_subs: HashMap<ObjectClassHandle, HashSet<AttributeHandle>>,
    interaction_pubs: HashSet<InteractionClassHandle>,
    interaction_subs: HashSet<InteractionClassHandle>,
}

impl Member {
    fn new(conn: u64, name: &str) -> Self {
        Self {
            conn,
            name: name.to_string(),
            time: 0.0,
            pending: None,
            lookahead: 0.0,
            regulating: false,
            constrained: false,
            object_pubs: HashMap::new(),
            object_subs: HashMap::new(),
            interaction_pubs: HashSet::new(),
            interaction_subs: HashSet::new(),
        }
    }
}

#[derive(Debug)]
struct SyncPoint {
    tag: Vec<u8>,
    announced: HashSet<FederateHandle>,
    achieved: HashSet<FederateHandle>,
}

#[derive(Debug)]
struct Instance {
    class: ObjectClassHandle,
    name: String,
    owner: FederateHandle,
    known_by: HashSet<FederateHandle>,
}

#[derive(Debug)]
pub(crate) struct Federation {
    pub(crate) name: String,
    fom_modules: Vec<String>,
    members: BTreeMap<FederateHandle, Member>,
    sync_points: BTreeMap<String, SyncPoint>,
    instances: BTreeMap<ObjectInstanceHandle, Instance>,
}

impl Federation {
    pub(crate) fn new(name: &str, fom_modules: &[String]) -> Self {
        Self {
            name: name.to_string(),
            fom_modules: fom_modules.to_vec(),
            members: BTreeMap::new(),
            sync_points: BTreeMap::new(),
            instances: BTreeMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Creation modules followed by the extra modules joiners brought.
    pub(crate) fn fom_modules(&self) -> &[String] {
        &self.fom_modules
    }

    pub(crate) fn member_names(&self) -> Vec<String> {
        self.members.values().map(|m| m.name.clone()).collect()
    }

    fn member(&self, federate: FederateHandle) -> RtiResult<&Member> {
        self.members
            .get(&federate)
            .ok_or(RtiException::FederateNotExecutionMember)
    }

    fn member_mut(&mut self, federate: FederateHandle) -> RtiResult<&mut Member> {
        self.members
            .get_mut(&federate)
            .ok_or(RtiException::FederateNotExecutionMember)
    }

    fn conn_of(&self, federate: FederateHandle) -> Option<u64> {
        self.members.get(&federate).map(|m| m.conn)
    }

    // ========================================================================
    // Membership
    // ========================================================================

    pub(crate) fn join(
        &mut self,
        federate: FederateHandle,
        conn: u64,
        name: &str,
        modules: &[String],
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        if self.members.values().any(|m| m.name == name) {
            return Err(RtiException::FederateNameAlreadyInUse(name.to_string()));
        }
        for module in modules {
            if !self.fom_modules.contains(module) {
                log::debug!("[local-rti] {}: '{}' adds module {}", self.name, name, module);
                self.fom_modules.push(module.clone());
            }
        }
        self.members.insert(federate, Member::new(conn, name));
        // pending points are announced to late joiners too
        for (label, point) in &mut self.sync_points {
            point.announced.insert(federate);
            outbox.push((conn, Callback::Announce(label.clone(), point.tag.clone())));
        }
        Ok(())
    }

    pub(crate) fn resign(
        &mut self,
        federate: FederateHandle,
        delete_objects: bool,
        min_federates: usize,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        self.member(federate)?;
        if delete_objects {
            let owned: Vec<ObjectInstanceHandle> = self
                .instances
                .iter()
                .filter(|(_, i)| i.owner == federate)
                .map(|(h, _)| *h)
                .collect();
            for instance in owned {
                self.remove_instance(instance, &[], outbox);
            }
        }
        self.members.remove(&federate);
        for instance in self.instances.values_mut() {
            instance.known_by.remove(&federate);
        }
        for point in self.sync_points.values_mut() {
            point.announced.remove(&federate);
            point.achieved.remove(&federate);
        }
        self.check_synchronized(min_federates, outbox);
        self.release_grants(outbox);
        Ok(())
    }

    // ========================================================================
    // Synchronization points
    // ========================================================================

    pub(crate) fn register_sync_point(
        &mut self,
        federate: FederateHandle,
        label: &str,
        tag: &[u8],
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let conn = self.member(federate)?.conn;
        if self.sync_points.contains_key(label) {
            outbox.push((
                conn,
                Callback::SyncRegistrationFailed(
                    label.to_string(),
                    SyncPointFailureReason::LabelNotUnique,
                ),
            ));
            return Ok(());
        }
        outbox.push((conn, Callback::SyncRegistrationSucceeded(label.to_string())));
        let mut point = SyncPoint {
            tag: tag.to_vec(),
            announced: HashSet::new(),
            achieved: HashSet::new(),
        };
        for (handle, member) in &self.members {
            point.announced.insert(*handle);
            outbox.push((
                member.conn,
                Callback::Announce(label.to_string(), tag.to_vec()),
            ));
        }
        self.sync_points.insert(label.to_string(), point);
        Ok(())
    }

    pub(crate) fn achieve_sync_point(
        &mut self,
        federate: FederateHandle,
        label: &str,
        min_federates: usize,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        self.member(federate)?;
        let point = self
            .sync_points
            .get_mut(label)
            .filter(|p| p.announced.contains(&federate))
            .ok_or_else(|| RtiException::SynchronizationPointLabelNotAnnounced(label.to_string()))?;
        point.achieved.insert(federate);
        self.check_synchronized(min_federates, outbox);
        Ok(())
    }

    fn check_synchronized(&mut self, min_federates: usize, outbox: &mut Outbox) {
        if self.members.len() < min_federates.max(1) {
            return;
        }
        let members = &self.members;
        let done: Vec<String> = self
            .sync_points
            .iter()
            .filter(|(_, p)| members.keys().all(|h| p.achieved.contains(h)))
            .map(|(label, _)| label.clone())
            .collect();
        for label in done {
            self.sync_points.remove(&label);
            log::debug!("[local-rti] {}: '{}' synchronized", self.name, label);
            for member in self.members.values() {
                outbox.push((member.conn, Callback::Synchronized(label.clone())));
            }
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub(crate) fn publish_object_class(
        &mut self,
        federate: FederateHandle,
        class: ObjectClassHandle,
        attributes: &[AttributeHandle],
    ) -> RtiResult<()> {
        self.member_mut(federate)?
            .object_pubs
            .entry(class)
            .or_default()
            .extend(attributes.iter().copied());
        Ok(())
    }

    pub(crate) fn subscribe_object_class(
        &mut self,
        federate: FederateHandle,
        class: ObjectClassHandle,
        attributes: &[AttributeHandle],
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let member = self.member_mut(federate)?;
        member
            .object_subs
            .entry(class)
            .or_default()
            .extend(attributes.iter().copied());
        let conn = member.conn;
        for (handle, instance) in &mut self.instances {
            if instance.class == class
                && instance.owner != federate
                && instance.known_by.insert(federate)
            {
                outbox.push((
                    conn,
                    Callback::Discover {
                        instance: *handle,
                        class,
                        name: instance.name.clone(),
                    },
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn publish_interaction(
        &mut self,
        federate: FederateHandle,
        class: InteractionClassHandle,
    ) -> RtiResult<()> {
        self.member_mut(federate)?.interaction_pubs.insert(class);
        Ok(())
    }

    pub(crate) fn subscribe_interaction(
        &mut self,
        federate: FederateHandle,
        class: InteractionClassHandle,
    ) -> RtiResult<()> {
        self.member_mut(federate)?.interaction_subs.insert(class);
        Ok(())
    }

    // ========================================================================
    // Object exchange
    // ========================================================================

    pub(crate) fn register_instance(
        &mut self,
        federate: FederateHandle,
        class: ObjectClassHandle,
        instance: ObjectInstanceHandle,
        name: String,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        if !self.member(federate)?.object_pubs.contains_key(&class) {
            return Err(RtiException::ObjectClassNotPublished(class.to_string()));
        }
        let mut known_by = HashSet::new();
        for (handle, member) in &self.members {
            if *handle != federate && member.object_subs.contains_key(&class) {
                known_by.insert(*handle);
                outbox.push((
                    member.conn,
                    Callback::Discover {
                        instance,
                        class,
                        name: name.clone(),
                    },
                ));
            }
        }
        self.instances.insert(
            instance,
            Instance {
                class,
                name,
                owner: federate,
                known_by,
            },
        );
        Ok(())
    }

    pub(crate) fn update_attributes(
        &mut self,
        federate: FederateHandle,
        instance: ObjectInstanceHandle,
        values: &AttributeValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let sender = self.member(federate)?;
        let target = self
            .instances
            .get(&instance)
            .filter(|i| i.owner == federate)
            .ok_or_else(|| RtiException::ObjectInstanceNotKnown(instance.to_string()))?;
        let published = sender.object_pubs.get(&target.class);
        if let Some(bad) = values
            .keys()
            .find(|a| !published.is_some_and(|p| p.contains(*a)))
        {
            return Err(RtiException::AttributeNotPublished(bad.to_string()));
        }
        for receiver in &target.known_by {
            let Some(member) = self.members.get(receiver) else {
                continue;
            };
            let Some(subscribed) = member.object_subs.get(&target.class) else {
                continue;
            };
            let filtered: AttributeValueMap = values
                .iter()
                .filter(|(a, _)| subscribed.contains(*a))
                .map(|(a, v)| (*a, v.clone()))
                .collect();
            if !filtered.is_empty() {
                outbox.push((
                    member.conn,
                    Callback::Reflect {
                        instance,
                        values: filtered,
                        tag: tag.to_vec(),
                        time,
                    },
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn send_interaction(
        &mut self,
        federate: FederateHandle,
        class: InteractionClassHandle,
        values: &ParameterValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        if !self.member(federate)?.interaction_pubs.contains(&class) {
            return Err(RtiException::InteractionClassNotPublished(class.to_string()));
        }
        for (handle, member) in &self.members {
            if *handle != federate && member.interaction_subs.contains(&class) {
                outbox.push((
                    member.conn,
                    Callback::Receive {
                        class,
                        values: values.clone(),
                        tag: tag.to_vec(),
                        time,
                    },
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn delete_instance(
        &mut self,
        federate: FederateHandle,
        instance: ObjectInstanceHandle,
        tag: &[u8],
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        self.member(federate)?;
        if !self
            .instances
            .get(&instance)
            .is_some_and(|i| i.owner == federate)
        {
            return Err(RtiException::ObjectInstanceNotKnown(instance.to_string()));
        }
        self.remove_instance(instance, tag, outbox);
        Ok(())
    }

    fn remove_instance(&mut self, instance: ObjectInstanceHandle, tag: &[u8], outbox: &mut Outbox) {
        let Some(removed) = self.instances.remove(&instance) else {
            return;
        };
        for receiver in &removed.known_by {
            if let Some(conn) = self.conn_of(*receiver) {
                outbox.push((
                    conn,
                    Callback::Remove {
                        instance,
                        tag: tag.to_vec(),
                    },
                ));
            }
        }
    }

    pub(crate) fn request_update(
        &self,
        federate: FederateHandle,
        instance: ObjectInstanceHandle,
        attributes: &[AttributeHandle],
        tag: &[u8],
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        self.member(federate)?;
        let target = self
            .instances
            .get(&instance)
            .ok_or_else(|| RtiException::ObjectInstanceNotKnown(instance.to_string()))?;
        if let Some(conn) = self.conn_of(target.owner) {
            outbox.push((
                conn,
                Callback::Provide {
                    instance,
                    attributes: attributes.to_vec(),
                    tag: tag.to_vec(),
                },
            ));
        }
        Ok(())
    }

    pub(crate) fn instance_by_name(&self, name: &str) -> Option<ObjectInstanceHandle> {
        self.instances
            .iter()
            .find(|(_, i)| i.name == name)
            .map(|(h, _)| *h)
    }

    pub(crate) fn instance_name(&self, instance: ObjectInstanceHandle) -> Option<&str> {
        self.instances.get(&instance).map(|i| i.name.as_str())
    }

    pub(crate) fn instance_class(&self, instance: ObjectInstanceHandle) -> Option<ObjectClassHandle> {
        self.instances.get(&instance).map(|i| i.class)
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Regulation starts no earlier than any constrained member's time, so
    /// the new regulator cannot send into someone's past.
    pub(crate) fn enable_regulation(
        &mut self,
        federate: FederateHandle,
        lookahead: f64,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        if !lookahead.is_finite() || lookahead < 0.0 {
            return Err(RtiException::InvalidLookahead(lookahead.to_string()));
        }
        let floor = self
            .members
            .iter()
            .filter(|(h, m)| **h != federate && m.constrained)
            .map(|(_, m)| m.time)
            .fold(f64::NEG_INFINITY, f64::max);
        let member = self.member_mut(federate)?;
        if member.regulating {
            return Err(RtiException::TimeRegulationAlreadyEnabled);
        }
        if member.pending.is_some() {
            return Err(RtiException::InTimeAdvancingState);
        }
        member.regulating = true;
        member.lookahead = lookahead;
        member.time = member.time.max(floor);
        outbox.push((member.conn, Callback::RegulationEnabled(member.time)));
        Ok(())
    }

    pub(crate) fn disable_regulation(
        &mut self,
        federate: FederateHandle,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let member = self.member_mut(federate)?;
        if !member.regulating {
            return Err(RtiException::TimeRegulationIsNotEnabled);
        }
        member.regulating = false;
        self.release_grants(outbox);
        Ok(())
    }

    pub(crate) fn enable_constrained(
        &mut self,
        federate: FederateHandle,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let member = self.member_mut(federate)?;
        if member.constrained {
            return Err(RtiException::TimeConstrainedAlreadyEnabled);
        }
        if member.pending.is_some() {
            return Err(RtiException::InTimeAdvancingState);
        }
        member.constrained = true;
        outbox.push((member.conn, Callback::ConstrainedEnabled(member.time)));
        Ok(())
    }

    pub(crate) fn disable_constrained(
        &mut self,
        federate: FederateHandle,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let member = self.member_mut(federate)?;
        if !member.constrained {
            return Err(RtiException::TimeConstrainedIsNotEnabled);
        }
        member.constrained = false;
        self.release_grants(outbox);
        Ok(())
    }

    /// Enter the time-advancing state. The grant follows as soon as no
    /// other regulating member can still send below `time`.
    pub(crate) fn advance(
        &mut self,
        federate: FederateHandle,
        time: LogicalTime,
        outbox: &mut Outbox,
    ) -> RtiResult<()> {
        let member = self.member_mut(federate)?;
        if member.pending.is_some() {
            return Err(RtiException::InTimeAdvancingState);
        }
        if !time.is_finite() || time < member.time {
            return Err(RtiException::InvalidLogicalTime(format!(
                "{} is before current time {}",
                time, member.time
            )));
        }
        member.pending = Some(time);
        self.release_grants(outbox);
        Ok(())
    }

    /// Greatest available logical time for `federate`: the lowest time stamp
    /// any other regulating member may still send. `None` when nobody else
    /// regulates.
    fn galt(&self, federate: FederateHandle) -> Option<LogicalTime> {
        self.members
            .iter()
            .filter(|(h, m)| **h != federate && m.regulating)
            .map(|(_, m)| m.pending.unwrap_or(m.time) + m.lookahead)
            .reduce(f64::min)
    }

    /// Grant every pending advance that is now safe.
    ///
    /// A member's bound is the same before and after its own grant, so one
    /// pass releases everything that can move.
    fn release_grants(&mut self, outbox: &mut Outbox) {
        let ready: Vec<(FederateHandle, LogicalTime)> = self
            .members
            .iter()
            .filter_map(|(handle, member)| {
                let time = member.pending?;
                let safe =
                    !member.constrained || !matches!(self.galt(*handle), Some(g) if time > g);
                safe.then_some((*handle, time))
            })
            .collect();
        for (handle, time) in ready {
            if let Some(member) = self.members.get_mut(&handle) {
                member.time = time;
                member.pending = None;
                outbox.push((member.conn, Callback::Grant(time)));
            }
        }
    }
}
