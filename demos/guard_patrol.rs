//! Guard Patrol Behaviour Tree
//!
//! This demo drives a two-level behaviour tree for a single guard NPC.
//!
//! Key concepts:
//! - Nested nodes: the brain's `Patrol` substate is itself a state machine
//! - Lazy reselection: patrol alternates walking and looking around
//! - Forced switches: a perceived threat pre-empts patrol with `Flee`
//! - Parameters: the patrol controller writes each waypoint into the walk leaf
//!
//! Run with: RUST_LOG=substate=debug cargo run --example guard_patrol

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use substate::core::{FsmError, ManualClock, ParameterSlot, State, StateId};
use substate::node::{Controller, NodeContext, StateMachineNode};
use substate::snapshot::TreeDump;
use substate::state_kind;
use tracing_subscriber::EnvFilter;

state_kind! {
    enum Activity {
        Brain,
        Patrol,
        Walk,
        LookAround,
        Flee,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct NpcId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct Point {
    x: f32,
    y: f32,
}

const PATROL: StateId = StateId(0);
const FLEE: StateId = StateId(1);
const WALK: StateId = StateId(0);
const LOOK: StateId = StateId(1);

/// Moves one unit per tick towards the target written into its slot.
struct WalkTo {
    slot: ParameterSlot,
    position: Rc<Cell<Point>>,
    target: Point,
}

impl State<Activity> for WalkTo {
    fn initialize(&mut self) -> Result<(), FsmError> {
        self.target = self.slot.decode()?;
        Ok(())
    }

    fn execute(&mut self) -> Result<(), FsmError> {
        let here = self.position.get();
        let (dx, dy) = (self.target.x - here.x, self.target.y - here.y);
        let distance = (dx * dx + dy * dy).sqrt();
        let step = distance.min(1.0);
        if distance > 0.0 {
            self.position.set(Point {
                x: here.x + dx / distance * step,
                y: here.y + dy / distance * step,
            });
        }
        Ok(())
    }

    fn check_completion(&self) -> bool {
        self.position.get() == self.target
    }

    fn state_type(&self) -> Activity {
        Activity::Walk
    }

    fn set_parameters(&mut self, bytes: &[u8]) -> Result<(), FsmError> {
        self.slot.write(bytes)
    }
}

/// Idles for a fixed number of ticks.
struct Countdown {
    kind: Activity,
    ticks: u32,
    left: u32,
}

impl State<Activity> for Countdown {
    fn initialize(&mut self) -> Result<(), FsmError> {
        self.left = self.ticks;
        Ok(())
    }

    fn execute(&mut self) -> Result<(), FsmError> {
        self.left = self.left.saturating_sub(1);
        Ok(())
    }

    fn check_completion(&self) -> bool {
        self.left == 0
    }

    fn state_type(&self) -> Activity {
        self.kind
    }
}

/// Walks the route, looking around at every waypoint.
struct Route {
    waypoints: Vec<Point>,
    next: usize,
}

impl Controller<NpcId, Activity> for Route {
    fn reselect_state(&mut self, ctx: &NodeContext<'_, NpcId>) -> Option<StateId> {
        match ctx.prev() {
            Some(WALK) => Some(LOOK),
            _ => Some(WALK),
        }
    }

    fn configure(
        &mut self,
        id: StateId,
        state: &mut dyn State<Activity>,
        _ctx: &NodeContext<'_, NpcId>,
    ) -> Result<(), FsmError> {
        if id != WALK || self.waypoints.is_empty() {
            return Ok(());
        }
        let waypoint = self.waypoints[self.next % self.waypoints.len()];
        self.next += 1;
        let bytes =
            bincode::serialize(&waypoint).map_err(|e| FsmError::ParameterEncoding(e.to_string()))?;
        state.set_parameters(&bytes)
    }
}

/// Top-level decisions driven by perception.
struct Brain {
    threat: Rc<Cell<bool>>,
}

impl Controller<NpcId, Activity> for Brain {
    fn reselect_state(&mut self, _ctx: &NodeContext<'_, NpcId>) -> Option<StateId> {
        Some(if self.threat.get() { FLEE } else { PATROL })
    }

    fn check_force_state(&mut self, ctx: &NodeContext<'_, NpcId>) -> Option<StateId> {
        (self.threat.get() && ctx.current() != Some(FLEE)).then_some(FLEE)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("substate=debug")),
        )
        .init();

    println!("=== Guard Patrol Behaviour Tree ===\n");

    let guard = NpcId(17);
    let clock = Rc::new(ManualClock::default());
    let position = Rc::new(Cell::new(Point { x: 0.0, y: 0.0 }));
    let threat = Rc::new(Cell::new(false));

    let mut patrol = StateMachineNode::new(
        guard,
        Activity::Patrol,
        clock.clone(),
        Route {
            waypoints: vec![Point { x: 2.0, y: 0.0 }, Point { x: 0.0, y: 0.0 }],
            next: 0,
        },
    );
    patrol.register(
        WALK,
        Box::new(WalkTo {
            slot: ParameterSlot::new(8),
            position: Rc::clone(&position),
            target: Point { x: 0.0, y: 0.0 },
        }),
    )?;
    patrol.register(
        LOOK,
        Box::new(Countdown {
            kind: Activity::LookAround,
            ticks: 2,
            left: 0,
        }),
    )?;

    let mut brain = StateMachineNode::new(
        guard,
        Activity::Brain,
        clock.clone(),
        Brain {
            threat: Rc::clone(&threat),
        },
    );
    brain.register(PATROL, Box::new(patrol))?;
    brain.register(
        FLEE,
        Box::new(Countdown {
            kind: Activity::Flee,
            ticks: 3,
            left: 0,
        }),
    )?;

    brain.initialize()?;

    for tick in 1..=14 {
        threat.set((8..=9).contains(&tick));
        clock.advance(chrono::Duration::milliseconds(100));

        brain.execute()?;

        let here = position.get();
        println!(
            "tick {tick:>2}: {:<10} at ({:.1}, {:.1})",
            format!("{:?}", brain.state_type()),
            here.x,
            here.y
        );
    }

    println!("\nFinal tree:");
    println!("{}", TreeDump::new(brain.snapshot()).to_json()?);

    println!("\nSelection history of the brain:");
    for record in brain.history().records() {
        println!(
            "  tick {:>2}: {:?} -> {:?} ({:?})",
            record.tick, record.from, record.to, record.cause
        );
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
