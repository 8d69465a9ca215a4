use crate::hardware::MotionSource;
use crate::samples::GyroData;

use super::Capability;

/// Gyroscope operations of a [`MotionManager`](super::MotionManager).
pub type Gyro<'a, K> = Capability<'a, K, dyn MotionSource, GyroData>;

#[cfg(test)]
mod tests {
    use futures::{FutureExt, StreamExt};

    use crate::hardware::fake::FakeMotionSource;
    use crate::hardware::{SensorKind, SensorSource};
    use crate::samples::{GyroData, Vector3};
    use crate::MotionManager;

    #[test]
    fn destroy_completes_the_stream() {
        let hw = FakeMotionSource::new();
        let manager = MotionManager::new(hw.motion_factory());
        manager.create("A").ok();

        let mut stream = manager.gyro().start_updates("A");
        assert_eq!(stream.next().now_or_never(), None);

        assert!(hw.push(GyroData::new(Vector3::new(0.1, 0.2, 0.3), 100.0)));
        assert_eq!(
            stream.next().now_or_never(),
            Some(Some(Ok(GyroData {
                rotation_rate: Vector3 { x: 0.1, y: 0.2, z: 0.3 },
                timestamp: 100.0,
            })))
        );

        manager.destroy(&"A");
        assert_eq!(stream.next().now_or_never(), Some(None));
        assert!(!manager.gyro().is_active(&"A"));
        assert!(!hw.is_active(SensorKind::Gyro));
        assert_eq!(hw.stop_count(SensorKind::Gyro), 1);
    }

    #[tokio::test]
    async fn samples_arrive_from_another_thread() {
        let hw = FakeMotionSource::new();
        let manager = MotionManager::new(hw.motion_factory());
        manager.create(7u32).ok();

        let mut stream = manager.gyro().start_updates(7);
        assert_eq!(stream.next().now_or_never(), None);

        let pusher = hw.clone();
        std::thread::spawn(move || {
            for i in 0..3 {
                pusher.push(GyroData::new(Vector3::new(f64::from(i), 0.0, 0.0), f64::from(i)));
            }
        })
        .join()
        .ok();

        let got: Vec<f64> = stream
            .by_ref()
            .take(3)
            .map(|r| r.map(|g| g.timestamp).unwrap_or(-1.0))
            .collect()
            .await;
        assert_eq!(got, vec![0.0, 1.0, 2.0]);
    }
}
