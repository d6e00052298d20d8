use proptest::prelude::*;
use typeahead_core::event::Event;
use typeahead_render::frame::Frame;
use typeahead_runtime::program::{Cmd, Model};
use typeahead_runtime::simulator::{ProgramSimulator, TaskMode};

#[derive(Default)]
struct Collector {
    delivered: Vec<usize>,
}

#[derive(Debug)]
enum CollectorMsg {
    Spawn(usize),
    Done(usize),
    Ignored,
}

impl From<Event> for CollectorMsg {
    fn from(_: Event) -> Self {
        CollectorMsg::Ignored
    }
}

impl Model for Collector {
    type Message = CollectorMsg;

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
        match msg {
            CollectorMsg::Spawn(n) => Cmd::batch(
                (0..n)
                    .map(|i| Cmd::task_named(format!("task {i}"), move || CollectorMsg::Done(i)))
                    .collect(),
            ),
            CollectorMsg::Done(i) => {
                self.delivered.push(i);
                Cmd::None
            }
            CollectorMsg::Ignored => Cmd::None,
        }
    }

    fn view(&self, _frame: &mut Frame) {}
}

#[test]
fn deferred_tasks_keep_names_in_spawn_order() {
    let mut sim = ProgramSimulator::new(Collector::default()).with_task_mode(TaskMode::Deferred);
    sim.send(CollectorMsg::Spawn(3));
    assert_eq!(
        sim.pending_task_names(),
        vec![Some("task 0"), Some("task 1"), Some("task 2")]
    );
    assert!(sim.run_pending_task(2));
    assert_eq!(sim.pending_task_names(), vec![Some("task 0"), Some("task 1")]);
    assert!(!sim.run_pending_task(5));
    assert_eq!(sim.model().delivered, vec![2]);
}

proptest! {
    #[test]
    fn every_deferred_task_is_delivered_once(
        count in 1usize..8,
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 8),
    ) {
        let mut sim = ProgramSimulator::new(Collector::default())
            .with_task_mode(TaskMode::Deferred);
        sim.send(CollectorMsg::Spawn(count));
        prop_assert_eq!(sim.pending_task_count(), count);

        for pick in picks.iter().take(count) {
            let remaining = sim.pending_task_count();
            prop_assert!(sim.run_pending_task(pick.index(remaining)));
        }

        prop_assert_eq!(sim.pending_task_count(), 0);
        let mut delivered = sim.model().delivered.clone();
        delivered.sort_unstable();
        prop_assert_eq!(delivered, (0..count).collect::<Vec<_>>());
    }
}
