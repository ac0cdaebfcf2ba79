// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One federate's connection to the loopback RTI.

use super::callback::{Callback, Outbox};
use super::federation::Federation;
use super::LocalRti;
use crate::handle::{
    AttributeHandle, FederateHandle, InteractionClassHandle, ObjectClassHandle,
    ObjectInstanceHandle, ParameterHandle,
};
use crate::rti::{
    AttributeValueMap, CallbackModel, FederateAmbassador, LogicalTime, ParameterValueMap,
    ResignAction, RtiAmbassador, RtiException, RtiResult,
};
use crossbeam::channel::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

enum Session {
    Evoked {
        queue: Receiver<Callback>,
        target: Arc<dyn FederateAmbassador>,
    },
    Immediate {
        worker: JoinHandle<()>,
    },
}

/// [`RtiAmbassador`] backed by a [`LocalRti`].
///
/// Dropping a joined ambassador resigns it (deleting its instances) and
/// disconnects it.
pub struct LocalRtiAmbassador {
    rti: LocalRti,
    conn: u64,
    session: Option<Session>,
    membership: Option<(String, FederateHandle)>,
}

impl std::fmt::Debug for LocalRtiAmbassador {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRtiAmbassador")
            .field("conn", &self.conn)
            .field("connected", &self.session.is_some())
            .field("membership", &self.membership)
            .finish()
    }
}

fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

impl LocalRtiAmbassador {
    pub(crate) fn new(rti: LocalRti, conn: u64) -> Self {
        Self {
            rti,
            conn,
            session: None,
            membership: None,
        }
    }

    /// Handle assigned at join, if joined.
    pub fn federate_handle(&self) -> Option<FederateHandle> {
        self.membership.as_ref().map(|(_, h)| *h)
    }

    fn ensure_connected(&self) -> RtiResult<()> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(RtiException::NotConnected)
        }
    }

    /// Run `op` on this federate's federation and send the callbacks it produced.
    fn with_federation<T>(
        &self,
        op: impl FnOnce(&mut Federation, FederateHandle, &mut Outbox, usize) -> RtiResult<T>,
    ) -> RtiResult<T> {
        self.ensure_connected()?;
        let (name, federate) = self
            .membership
            .as_ref()
            .ok_or(RtiException::FederateNotExecutionMember)?;
        let mut guard = self.rti.lock();
        let shared = &mut *guard;
        let federation = shared
            .federations
            .get_mut(name)
            .ok_or(RtiException::FederateNotExecutionMember)?;
        let mut outbox = Outbox::new();
        let result = op(federation, *federate, &mut outbox, shared.min_federates);
        shared.dispatch(outbox);
        result
    }

    fn read_federation<T>(&self, op: impl FnOnce(&Federation) -> Option<T>) -> RtiResult<Option<T>> {
        let (name, _) = self
            .membership
            .as_ref()
            .ok_or(RtiException::FederateNotExecutionMember)?;
        let shared = self.rti.lock();
        Ok(shared.federations.get(name).and_then(op))
    }

    fn check_object_class(&self, class: ObjectClassHandle, attributes: &[AttributeHandle]) -> RtiResult<()> {
        let shared = self.rti.lock();
        shared.catalog.object_class_name(class)?;
        for attribute in attributes {
            shared.catalog.attribute_name(class, *attribute)?;
        }
        Ok(())
    }

    fn check_interaction_class(&self, class: InteractionClassHandle) -> RtiResult<()> {
        self.rti.lock().catalog.interaction_class_name(class).map(|_| ())
    }
}

impl RtiAmbassador for LocalRtiAmbassador {
    fn connect(
        &mut self,
        callbacks: Arc<dyn FederateAmbassador>,
        model: CallbackModel,
    ) -> RtiResult<()> {
        if self.session.is_some() {
            return Err(RtiException::AlreadyConnected);
        }
        let (sender, queue) = channel::unbounded();
        let session = match model {
            CallbackModel::Evoked => Session::Evoked {
                queue,
                target: callbacks,
            },
            CallbackModel::Immediate => {
                let worker = thread::Builder::new()
                    .name(format!("local-rti-{}", self.conn))
                    .spawn(move || {
                        for callback in queue.iter() {
                            callback.deliver(callbacks.as_ref());
                        }
                    })
                    .map_err(|e| RtiException::Internal(format!("delivery thread: {}", e)))?;
                Session::Immediate { worker }
            }
        };
        self.rti.lock().connections.insert(self.conn, sender);
        self.session = Some(session);
        log::debug!("[local-rti] connection {} up ({:?})", self.conn, model);
        Ok(())
    }

    fn disconnect(&mut self) -> RtiResult<()> {
        if self.membership.is_some() {
            return Err(RtiException::FederateAlreadyExecutionMember);
        }
        let session = self.session.take().ok_or(RtiException::NotConnected)?;
        // dropping the only sender ends the delivery thread
        self.rti.lock().connections.remove(&self.conn);
        if let Session::Immediate { worker } = session {
            if worker.join().is_err() {
                log::warn!("[local-rti] delivery thread {} panicked", self.conn);
            }
        }
        log::debug!("[local-rti] connection {} down", self.conn);
        Ok(())
    }

    fn create_federation_execution(&mut self, name: &str, fom_modules: &[String]) -> RtiResult<()> {
        self.ensure_connected()?;
        let mut shared = self.rti.lock();
        if shared.federations.contains_key(name) {
            return Err(RtiException::FederationExecutionAlreadyExists(name.to_string()));
        }
        shared
            .federations
            .insert(name.to_string(), Federation::new(name, fom_modules));
        log::debug!("[local-rti] federation '{}' created ({} modules)", name, fom_modules.len());
        Ok(())
    }

    fn destroy_federation_execution(&mut self, name: &str) -> RtiResult<()> {
        self.ensure_connected()?;
        let mut shared = self.rti.lock();
        match shared.federations.get(name) {
            None => Err(RtiException::FederationExecutionDoesNotExist(name.to_string())),
            Some(federation) if !federation.is_empty() => {
                Err(RtiException::FederatesCurrentlyJoined(name.to_string()))
            }
            Some(_) => {
                shared.federations.remove(name);
                log::debug!("[local-rti] federation '{}' destroyed", name);
                Ok(())
            }
        }
    }

    fn join_federation_execution(
        &mut self,
        federate_name: &str,
        federate_type: &str,
        federation_name: &str,
        modules: &[String],
    ) -> RtiResult<FederateHandle> {
        self.ensure_connected()?;
        if self.membership.is_some() {
            return Err(RtiException::FederateAlreadyExecutionMember);
        }
        let mut guard = self.rti.lock();
        let shared = &mut *guard;
        shared.join_attempts += 1;
        if shared.failing_joins > 0 {
            shared.failing_joins -= 1;
            return Err(RtiException::Internal(format!(
                "join of '{}' refused",
                federate_name
            )));
        }
        let federation = shared.federations.get_mut(federation_name).ok_or_else(|| {
            RtiException::FederationExecutionDoesNotExist(federation_name.to_string())
        })?;
        let handle = FederateHandle::new(shared.next_federate);
        let mut outbox = Outbox::new();
        federation.join(handle, self.conn, federate_name, modules, &mut outbox)?;
        shared.next_federate += 1;
        log::debug!(
            "[local-rti] '{}' ({}) joined '{}' as {} with {} extra modules",
            federate_name,
            federate_type,
            federation_name,
            handle,
            modules.len()
        );
        shared.dispatch(outbox);
        drop(guard);
        self.membership = Some((federation_name.to_string(), handle));
        Ok(handle)
    }

    fn resign_federation_execution(&mut self, action: ResignAction) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, min| {
            federation.resign(federate, action.deletes_objects(), min, outbox)
        })?;
        if let Some((name, handle)) = self.membership.take() {
            log::debug!("[local-rti] {} resigned from '{}'", handle, name);
        }
        Ok(())
    }

    fn register_federation_synchronization_point(&mut self, label: &str, tag: &[u8]) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.register_sync_point(federate, label, tag, outbox)
        })
    }

    fn synchronization_point_achieved(&mut self, label: &str) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, min| {
            federation.achieve_sync_point(federate, label, min, outbox)
        })
    }

    fn publish_object_class_attributes(
        &mut self,
        class: ObjectClassHandle,
        attributes: &[AttributeHandle],
    ) -> RtiResult<()> {
        self.check_object_class(class, attributes)?;
        self.with_federation(|federation, federate, _, _| {
            federation.publish_object_class(federate, class, attributes)
        })
    }

    fn subscribe_object_class_attributes(
        &mut self,
        class: ObjectClassHandle,
        attributes: &[AttributeHandle],
    ) -> RtiResult<()> {
        self.check_object_class(class, attributes)?;
        self.with_federation(|federation, federate, outbox, _| {
            federation.subscribe_object_class(federate, class, attributes, outbox)
        })
    }

    fn publish_interaction_class(&mut self, class: InteractionClassHandle) -> RtiResult<()> {
        self.check_interaction_class(class)?;
        self.with_federation(|federation, federate, _, _| {
            federation.publish_interaction(federate, class)
        })
    }

    fn subscribe_interaction_class(&mut self, class: InteractionClassHandle) -> RtiResult<()> {
        self.check_interaction_class(class)?;
        self.with_federation(|federation, federate, _, _| {
            federation.subscribe_interaction(federate, class)
        })
    }

    fn register_object_instance(&mut self, class: ObjectClassHandle) -> RtiResult<ObjectInstanceHandle> {
        self.check_object_class(class, &[])?;
        let instance = {
            let mut shared = self.rti.lock();
            let raw = shared.next_instance;
            shared.next_instance += 1;
            ObjectInstanceHandle::new(raw)
        };
        let name = format!("HLAobject{}", instance.raw());
        self.with_federation(|federation, federate, outbox, _| {
            federation.register_instance(federate, class, instance, name, outbox)
        })?;
        Ok(instance)
    }

    fn update_attribute_values(
        &mut self,
        instance: ObjectInstanceHandle,
        values: &AttributeValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
    ) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.update_attributes(federate, instance, values, tag, time, outbox)
        })
    }

    fn send_interaction(
        &mut self,
        class: InteractionClassHandle,
        values: &ParameterValueMap,
        tag: &[u8],
        time: Option<LogicalTime>,
    ) -> RtiResult<()> {
        {
            let shared = self.rti.lock();
            for parameter in values.keys() {
                shared.catalog.parameter_name(class, *parameter)?;
            }
        }
        self.with_federation(|federation, federate, outbox, _| {
            federation.send_interaction(federate, class, values, tag, time, outbox)
        })
    }

    fn delete_object_instance(&mut self, instance: ObjectInstanceHandle, tag: &[u8]) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.delete_instance(federate, instance, tag, outbox)
        })
    }

    fn request_attribute_value_update(
        &mut self,
        instance: ObjectInstanceHandle,
        attributes: &[AttributeHandle],
        tag: &[u8],
    ) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.request_update(federate, instance, attributes, tag, outbox)
        })
    }

    fn enable_time_regulation(&mut self, lookahead: f64) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.enable_regulation(federate, lookahead, outbox)
        })
    }

    fn disable_time_regulation(&mut self) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.disable_regulation(federate, outbox)
        })
    }

    fn enable_time_constrained(&mut self) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.enable_constrained(federate, outbox)
        })
    }

    fn disable_time_constrained(&mut self) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.disable_constrained(federate, outbox)
        })
    }

    fn time_advance_request(&mut self, time: LogicalTime) -> RtiResult<()> {
        self.with_federation(|federation, federate, outbox, _| {
            federation.advance(federate, time, outbox)
        })
    }

    fn evoke_multiple_callbacks(&mut self, min_secs: f64, max_secs: f64) -> RtiResult<bool> {
        match &self.session {
            None => Err(RtiException::NotConnected),
            Some(Session::Immediate { .. }) => {
                // callbacks arrive on the delivery thread; just yield
                thread::sleep(secs(min_secs));
                Ok(false)
            }
            Some(Session::Evoked { queue, target }) => {
                let started = Instant::now();
                let window = secs(max_secs.max(min_secs));
                match queue.recv_timeout(secs(min_secs)) {
                    Ok(callback) => callback.deliver(target.as_ref()),
                    Err(_) => return Ok(false),
                }
                while started.elapsed() < window {
                    match queue.try_recv() {
                        Ok(callback) => callback.deliver(target.as_ref()),
                        Err(_) => break,
                    }
                }
                Ok(!queue.is_empty())
            }
        }
    }

    fn get_object_class_handle(&self, name: &str) -> RtiResult<ObjectClassHandle> {
        self.rti.lock().catalog.object_class_handle(name)
    }

    fn get_object_class_name(&self, handle: ObjectClassHandle) -> RtiResult<String> {
        self.rti.lock().catalog.object_class_name(handle)
    }

    fn get_attribute_handle(&self, class: ObjectClassHandle, name: &str) -> RtiResult<AttributeHandle> {
        self.rti.lock().catalog.attribute_handle(class, name)
    }

    fn get_attribute_name(&self, class: ObjectClassHandle, handle: AttributeHandle) -> RtiResult<String> {
        self.rti.lock().catalog.attribute_name(class, handle)
    }

    fn get_interaction_class_handle(&self, name: &str) -> RtiResult<InteractionClassHandle> {
        self.rti.lock().catalog.interaction_class_handle(name)
    }

    fn get_interaction_class_name(&self, handle: InteractionClassHandle) -> RtiResult<String> {
        self.rti.lock().catalog.interaction_class_name(handle)
    }

    fn get_parameter_handle(
        &self,
        class: InteractionClassHandle,
        name: &str,
    ) -> RtiResult<ParameterHandle> {
        self.rti.lock().catalog.parameter_handle(class, name)
    }

    fn get_parameter_name(
        &self,
        class: InteractionClassHandle,
        handle: ParameterHandle,
    ) -> RtiResult<String> {
        self.rti.lock().catalog.parameter_name(class, handle)
    }

    fn get_object_instance_handle(&self, name: &str) -> RtiResult<ObjectInstanceHandle> {
        self.read_federation(|federation| federation.instance_by_name(name))?
            .ok_or_else(|| RtiException::ObjectInstanceNotKnown(name.to_string()))
    }

    fn get_object_instance_name(&self, handle: ObjectInstanceHandle) -> RtiResult<String> {
        self.read_federation(|federation| federation.instance_name(handle).map(str::to_string))?
            .ok_or_else(|| RtiException::ObjectInstanceNotKnown(handle.to_string()))
    }

    fn get_known_object_class_handle(
        &self,
        instance: ObjectInstanceHandle,
    ) -> RtiResult<ObjectClassHandle> {
        self.read_federation(|federation| federation.instance_class(instance))?
            .ok_or_else(|| RtiException::ObjectInstanceNotKnown(instance.to_string()))
    }
}

impl Drop for LocalRtiAmbassador {
    fn drop(&mut self) {
        if self.membership.is_some() {
            if let Err(e) = self.resign_federation_execution(ResignAction::DeleteObjects) {
                log::debug!("[local-rti] resign on drop failed: {}", e);
            }
        }
        if self.session.is_some() {
            if let Err(e) = self.disconnect() {
                log::debug!("[local-rti] disconnect on drop failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rti::local::NullCallbacks;
    use crate::rti::SyncPointFailureReason;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.events.lock())
        }

        fn push(&self, event: String) {
            self.events.lock().push(event);
        }
    }

    impl FederateAmbassador for Recorder {
        fn synchronization_point_registration_succeeded(&self, label: &str) {
            self.push(format!("registered {}", label));
        }
        fn synchronization_point_registration_failed(&self, label: &str, reason: SyncPointFailureReason) {
            self.push(format!("register failed {} {:?}", label, reason));
        }
        fn announce_synchronization_point(&self, label: &str, _tag: &[u8]) {
            self.push(format!("announced {}", label));
        }
        fn federation_synchronized(&self, label: &str) {
            self.push(format!("synchronized {}", label));
        }
        fn time_regulation_enabled(&self, time: LogicalTime) {
            self.push(format!("regulating {}", time));
        }
        fn time_constrained_enabled(&self, time: LogicalTime) {
            self.push(format!("constrained {}", time));
        }
        fn time_advance_grant(&self, time: LogicalTime) {
            self.push(format!("grant {}", time));
        }
        fn discover_object_instance(
            &self,
            instance: ObjectInstanceHandle,
            _class: ObjectClassHandle,
            _name: &str,
        ) {
            self.push(format!("discover {}", instance.raw()));
        }
        fn reflect_attribute_values(
            &self,
            instance: ObjectInstanceHandle,
            values: AttributeValueMap,
            _tag: &[u8],
            _time: Option<LogicalTime>,
        ) {
            self.push(format!("reflect {} {}", instance.raw(), values.len()));
        }
        fn receive_interaction(
            &self,
            _class: InteractionClassHandle,
            values: ParameterValueMap,
            _tag: &[u8],
            _time: Option<LogicalTime>,
        ) {
            self.push(format!("receive {}", values.len()));
        }
        fn remove_object_instance(&self, instance: ObjectInstanceHandle, _tag: &[u8]) {
            self.push(format!("remove {}", instance.raw()));
        }
    }

    fn drain(amb: &mut LocalRtiAmbassador) {
        while amb.evoke_multiple_callbacks(0.0, 0.1).unwrap() {}
    }

    #[test]
    fn test_requires_connection() {
        let rti = LocalRti::new();
        let mut amb = rti.ambassador();
        assert_eq!(
            amb.create_federation_execution("Demo", &[]),
            Err(RtiException::NotConnected)
        );
        assert_eq!(amb.evoke_multiple_callbacks(0.0, 0.0), Err(RtiException::NotConnected));
    }

    #[test]
    fn test_connect_twice_rejected() {
        let rti = LocalRti::new();
        let mut amb = rti.ambassador();
        amb.connect(Arc::new(NullCallbacks), CallbackModel::Evoked).unwrap();
        assert_eq!(
            amb.connect(Arc::new(NullCallbacks), CallbackModel::Evoked),
            Err(RtiException::AlreadyConnected)
        );
    }

    #[test]
    fn test_evoked_interaction_exchange() {
        let rti = LocalRti::new();
        let rec_b = Arc::new(Recorder::default());
        let mut a = rti.ambassador();
        let mut b = rti.ambassador();
        a.connect(Arc::new(NullCallbacks), CallbackModel::Evoked).unwrap();
        b.connect(rec_b.clone(), CallbackModel::Evoked).unwrap();
        a.create_federation_execution("Demo", &[]).unwrap();
        a.join_federation_execution("A", "T", "Demo", &[]).unwrap();
        b.join_federation_execution("B", "T", "Demo", &[]).unwrap();

        let ping = a.get_interaction_class_handle("Ping").unwrap();
        let count = a.get_parameter_handle(ping, "count").unwrap();
        a.publish_interaction_class(ping).unwrap();
        b.subscribe_interaction_class(ping).unwrap();

        let mut values = ParameterValueMap::new();
        values.insert(count, vec![0, 0, 0, 1]);
        a.send_interaction(ping, &values, b"", None).unwrap();

        // nothing is delivered until evoked
        assert!(rec_b.take().is_empty());
        drain(&mut b);
        assert_eq!(rec_b.take(), vec!["receive 1"]);
    }

    #[test]
    fn test_send_unpublished_rejected() {
        let rti = LocalRti::new();
        let mut a = rti.ambassador();
        a.connect(Arc::new(NullCallbacks), CallbackModel::Evoked).unwrap();
        a.create_federation_execution("Demo", &[]).unwrap();
        a.join_federation_execution("A", "T", "Demo", &[]).unwrap();
        let ping = a.get_interaction_class_handle("Ping").unwrap();
        assert!(matches!(
            a.send_interaction(ping, &ParameterValueMap::new(), b"", None),
            Err(RtiException::InteractionClassNotPublished(_))
        ));
    }

    #[test]
    fn test_object_discovery_and_reflection() {
        let rti = LocalRti::new();
        let rec_b = Arc::new(Recorder::default());
        let mut a = rti.ambassador();
        let mut b = rti.ambassador();
        a.connect(Arc::new(NullCallbacks), CallbackModel::Evoked).unwrap();
        b.connect(rec_b.clone(), CallbackModel::Evoked).unwrap();
        a.create_federation_execution("Demo", &[]).unwrap();
        a.join_federation_execution("A", "T", "Demo", &[]).unwrap();
        b.join_federation_execution("B", "T", "Demo", &[]).unwrap();

        let car = a.get_object_class_handle("Car").unwrap();
        let speed = a.get_attribute_handle(car, "speed").unwrap();
        let colour = a.get_attribute_handle(car, "colour").unwrap();
        a.publish_object_class_attributes(car, &[speed, colour]).unwrap();
        let instance = a.register_object_instance(car).unwrap();

        // discovery happens when b subscribes after registration
        b.subscribe_object_class_attributes(car, &[speed]).unwrap();
        let mut values = AttributeValueMap::new();
        values.insert(speed, vec![1]);
        values.insert(colour, vec![2]);
        a.update_attribute_values(instance, &values, b"", None).unwrap();
        a.delete_object_instance(instance, b"").unwrap();

        drain(&mut b);
        let raw = instance.raw();
        assert_eq!(
            rec_b.take(),
            vec![
                format!("discover {}", raw),
                format!("reflect {} 1", raw),
                format!("remove {}", raw),
            ]
        );
    }

    #[test]
    fn test_immediate_delivery_thread() {
        let rti = LocalRti::new();
        let rec = Arc::new(Recorder::default());
        let mut a = rti.ambassador();
        a.connect(rec.clone(), CallbackModel::Immediate).unwrap();
        a.create_federation_execution("Demo", &[]).unwrap();
        a.join_federation_execution("A", "T", "Demo", &[]).unwrap();
        a.enable_time_regulation(1.0).unwrap();
        a.time_advance_request(1.0).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while rec.events.lock().len() < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(rec.take(), vec!["regulating 0", "grant 1"]);

        a.resign_federation_execution(ResignAction::default()).unwrap();
        a.disconnect().unwrap();
    }

    #[test]
    fn test_failing_joins_counted() {
        let rti = LocalRti::new();
        rti.fail_next_joins(1);
        let mut a = rti.ambassador();
        a.connect(Arc::new(NullCallbacks), CallbackModel::Evoked).unwrap();
        a.create_federation_execution("Demo", &[]).unwrap();
        assert!(a.join_federation_execution("A", "T", "Demo", &[]).is_err());
        assert!(a.join_federation_execution("A", "T", "Demo", &[]).is_ok());
        assert_eq!(rti.join_attempts(), 2);
        assert_eq!(rti.joined_federates("Demo"), vec!["A"]);
    }

    #[test]
    fn test_drop_resigns() {
        let rti = LocalRti::new();
        {
            let mut a = rti.ambassador();
            a.connect(Arc::new(NullCallbacks), CallbackModel::Evoked).unwrap();
            a.create_federation_execution("Demo", &[]).unwrap();
            a.join_federation_execution("A", "T", "Demo", &[]).unwrap();
        }
        assert!(rti.joined_federates("Demo").is_empty());
        assert!(rti.federation_exists("Demo"));
    }
}
