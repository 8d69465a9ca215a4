use crate::core::{SensorStream, SessionId};
use crate::hardware::{
    AttitudeReferenceFrame, DeliveryOptions, DeliveryQueue, MotionSource, SensorKind,
};
use crate::samples::DeviceMotion;

use super::Capability;

/// Device-motion operations of a [`MotionManager`](super::MotionManager).
pub type DeviceMotionUpdates<'a, K> = Capability<'a, K, dyn MotionSource, DeviceMotion>;

impl<K: SessionId> Capability<'_, K, dyn MotionSource, DeviceMotion> {
    /// Starts updates relative to `frame`, on the configured default queue.
    pub fn start_updates_using(
        &self,
        id: K,
        frame: AttitudeReferenceFrame,
    ) -> SensorStream<DeviceMotion> {
        let queue = self.registry.config().default_queue.clone();
        self.start_updates_using_on(id, frame, queue)
    }

    /// Starts updates relative to `frame`, delivered on `queue`.
    pub fn start_updates_using_on(
        &self,
        id: K,
        frame: AttitudeReferenceFrame,
        queue: DeliveryQueue,
    ) -> SensorStream<DeviceMotion> {
        self.start_updates_with(id, DeliveryOptions::on(queue).using(frame))
    }

    /// Reference frame the source currently uses for attitude.
    ///
    /// An unknown id is reported and answered with the platform default,
    /// [`AttitudeReferenceFrame::XArbitraryZVertical`].
    pub fn attitude_reference_frame(&self, id: &K) -> AttitudeReferenceFrame {
        self.registry
            .query(
                id,
                "attitude_reference_frame",
                Some(SensorKind::DeviceMotion),
                |h| h.attitude_reference_frame(),
            )
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use futures::{FutureExt, StreamExt};

    use crate::core::{Builder, Config};
    use crate::events::EventKind;
    use crate::hardware::fake::FakeMotionSource;
    use crate::hardware::{AttitudeReferenceFrame, DeliveryQueue, SensorKind};
    use crate::samples::{Attitude, DeviceMotion, Quaternion, Vector3};
    use crate::MotionManager;

    fn motion(t: f64) -> DeviceMotion {
        DeviceMotion {
            attitude: Attitude::from_quaternion(Quaternion::new(0.0, 0.0, 0.0, 1.0)),
            gravity: Vector3::new(0.0, 0.0, -1.0),
            heading: -1.0,
            timestamp: t,
            ..DeviceMotion::default()
        }
    }

    #[test]
    fn reference_frame_is_forwarded() {
        let hw = FakeMotionSource::new();
        let manager = MotionManager::new(hw.motion_factory());
        manager.create("A").ok();
        let dm = manager.device_motion();

        assert_eq!(
            dm.attitude_reference_frame(&"A"),
            AttitudeReferenceFrame::XArbitraryZVertical
        );
        let mut stream = dm.start_updates_using_on(
            "A",
            AttitudeReferenceFrame::XTrueNorthZVertical,
            DeliveryQueue::named("motion"),
        );
        assert_eq!(stream.next().now_or_never(), None);
        assert_eq!(
            dm.attitude_reference_frame(&"A"),
            AttitudeReferenceFrame::XTrueNorthZVertical
        );

        hw.push(motion(3.5));
        assert_eq!(stream.next().now_or_never(), Some(Some(Ok(motion(3.5)))));
        assert_eq!(dm.latest(&"A"), Some(motion(3.5)));
    }

    #[test]
    fn default_frame_comes_from_config() {
        let hw = FakeMotionSource::new();
        let manager = Builder::new(Config {
            default_reference_frame: Some(AttitudeReferenceFrame::XMagneticNorthZVertical),
            ..Config::default()
        })
        .motion(hw.motion_factory());
        manager.create("A").ok();

        let mut stream = manager.device_motion().start_updates("A");
        assert_eq!(stream.next().now_or_never(), None);
        let opts = hw.delivery_options(SensorKind::DeviceMotion).expect("started");
        assert_eq!(
            opts.reference_frame,
            Some(AttitudeReferenceFrame::XMagneticNorthZVertical)
        );
        assert_eq!(opts.queue, DeliveryQueue::Main);
    }

    #[test]
    fn explicit_queue_keeps_configured_frame() {
        let hw = FakeMotionSource::new();
        let manager = Builder::new(Config {
            default_reference_frame: Some(AttitudeReferenceFrame::XMagneticNorthZVertical),
            ..Config::default()
        })
        .motion(hw.motion_factory());
        manager.create("A").ok();

        let mut stream = manager
            .device_motion()
            .start_updates_on("A", DeliveryQueue::named("q"));
        assert_eq!(stream.next().now_or_never(), None);
        let opts = hw.delivery_options(SensorKind::DeviceMotion).expect("started");
        assert_eq!(
            opts.reference_frame,
            Some(AttitudeReferenceFrame::XMagneticNorthZVertical)
        );
        assert_eq!(opts.queue, DeliveryQueue::named("q"));

        let mut gyro = manager.gyro().start_updates_on("A", DeliveryQueue::named("q"));
        assert_eq!(gyro.next().now_or_never(), None);
        let opts = hw.delivery_options(SensorKind::Gyro).expect("started");
        assert_eq!(opts.reference_frame, None);
    }

    #[test]
    fn missing_session_gets_platform_default_frame() {
        let hw = FakeMotionSource::new();
        let manager = MotionManager::<&'static str>::new(hw.motion_factory());
        let mut events = manager.events();

        assert_eq!(
            manager.device_motion().attitude_reference_frame(&"nope"),
            AttitudeReferenceFrame::default()
        );
        let ev = events.try_recv().expect("report");
        assert_eq!(ev.kind, EventKind::SessionNotFound);
        assert_eq!(ev.operation, Some("attitude_reference_frame"));
    }
}
