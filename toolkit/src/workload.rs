use std::time::Instant;

use rand::prelude::*;
use serde::Serialize;

use crate::error::ViskitError;
use crate::priority_queue::IndexedPriorityQueue;
use crate::settings::{BenchSettings, Workload};

/// Outcome of one benchmark run
#[derive(Debug, Default, Serialize)]
pub struct WorkloadReport {
    pub inserted: usize,
    pub removed: usize,
    pub reprioritized: usize,
    /// Entries left the queue in priority order, or with the priority they were given
    pub consistent: bool,
    pub elapsed_ms: f64,
}

/// Pop every entry of `queue`.
/// Returns the number of popped entries and whether their priorities never decreased.
fn drain(queue: &mut IndexedPriorityQueue) -> (usize, bool) {
    let mut count = 0;
    let mut ordered = true;
    let mut last = f64::MIN;
    while let Some(item) = queue.pop_at(0) {
        ordered &= item.priority >= last;
        last = item.priority;
        count += 1;
    }
    (count, ordered)
}

/// Fill a queue with `settings.num_items` random priorities and apply `settings.workload`
pub fn run<R: Rng>(settings: &BenchSettings, rng: &mut R) -> Result<WorkloadReport, ViskitError> {
    let mut queue = IndexedPriorityQueue::new(&settings.queue)?;
    let mut report = WorkloadReport::default();
    let start = Instant::now();

    let priorities: Vec<f64> = (0..settings.num_items).map(|_| rng.gen()).collect();
    for (id, &priority) in priorities.iter().enumerate() {
        queue.insert(priority, id)?;
    }
    report.inserted = queue.len();

    match settings.workload {
        Workload::Drain => {
            let (removed, ordered) = drain(&mut queue);
            report.removed = removed;
            report.consistent = ordered;
        }
        Workload::DeleteIds => {
            let mut ids: Vec<usize> = (0..settings.num_items).collect();
            ids.shuffle(rng);
            report.consistent = true;
            for id in ids {
                match queue.delete_id(id) {
                    Some(priority) => {
                        report.consistent &= priority == priorities[id];
                        report.removed += 1;
                    }
                    None => report.consistent = false
                }
            }
        }
        Workload::Reprioritize => {
            for id in 0..settings.num_items {
                if queue.set_priority(rng.gen(), id).is_some() {
                    report.reprioritized += 1;
                }
            }
            let (removed, ordered) = drain(&mut queue);
            report.removed = removed;
            report.consistent = ordered;
        }
    }

    report.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    log::debug!("Finished {:?} workload. report={:?}.", settings.workload, &report);

    Ok(report)
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use crate::settings::{BenchSettings, QueueSettings, Workload};
    use crate::workload::run;

    fn settings(workload: Workload) -> BenchSettings {
        BenchSettings {
            queue: QueueSettings { initial_size: 16, extend: 16 },
            workload,
            num_items: 300,
            seed: Some(1),
            loop_count: 1,
            json: false,
        }
    }

    #[test]
    fn test_workloads() {
        for &workload in &[Workload::Drain, Workload::DeleteIds, Workload::Reprioritize] {
            let mut rng = StdRng::seed_from_u64(1);
            let report = run(&settings(workload), &mut rng).unwrap();

            assert_eq!(report.inserted, 300, "{:?}", workload);
            assert_eq!(report.removed, 300, "{:?}", workload);
            assert!(report.consistent, "{:?} report: {:?}", workload, report);
        }
    }

    #[test]
    fn test_reprioritize_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let report = run(&settings(Workload::Reprioritize), &mut rng).unwrap();
        assert_eq!(report.reprioritized, 300);
    }

    #[test]
    fn test_invalid_queue_settings() {
        let mut settings = settings(Workload::Drain);
        settings.queue.extend = 0;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(run(&settings, &mut rng).is_err());
    }
}
