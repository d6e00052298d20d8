use typeahead_core::event::Event;
use typeahead_render::frame::Frame;
use typeahead_runtime::program::{Cmd, Model};
use typeahead_runtime::simulator::{ProgramSimulator, TaskMode};

struct TestModel {
    executed_after_quit: bool,
    task_results: Vec<&'static str>,
}

#[derive(Debug)]
enum TestMsg {
    QuitInBatch,
    SetExecuted,
    SpawnThenQuit,
    TaskDone(&'static str),
}

impl From<Event> for TestMsg {
    fn from(_: Event) -> Self {
        TestMsg::QuitInBatch
    }
}

impl Model for TestModel {
    type Message = TestMsg;

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
        match msg {
            TestMsg::QuitInBatch => Cmd::Batch(vec![
                Cmd::Quit,
                Cmd::Msg(TestMsg::SetExecuted), // Should NOT be executed
            ]),
            TestMsg::SetExecuted => {
                self.executed_after_quit = true;
                Cmd::None
            }
            TestMsg::SpawnThenQuit => Cmd::sequence(vec![
                Cmd::task_named("late", || TestMsg::TaskDone("late")),
                Cmd::Quit,
            ]),
            TestMsg::TaskDone(name) => {
                self.task_results.push(name);
                Cmd::None
            }
        }
    }

    fn view(&self, _frame: &mut Frame) {}
}

fn model() -> TestModel {
    TestModel {
        executed_after_quit: false,
        task_results: Vec::new(),
    }
}

#[test]
fn batch_stops_after_quit() {
    let mut sim = ProgramSimulator::new(model());
    sim.init();

    sim.send(TestMsg::QuitInBatch);

    assert!(
        !sim.model().executed_after_quit,
        "Commands after Quit in Batch should not be executed"
    );
    assert!(!sim.is_running(), "Simulator should have stopped");
}

#[test]
fn deferred_task_is_not_delivered_after_quit() {
    let mut sim = ProgramSimulator::new(model()).with_task_mode(TaskMode::Deferred);
    sim.send(TestMsg::SpawnThenQuit);

    assert_eq!(sim.pending_task_count(), 1);
    assert!(!sim.is_running());

    sim.run_pending_tasks();
    assert!(sim.model().task_results.is_empty());
}
