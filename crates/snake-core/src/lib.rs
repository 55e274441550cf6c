//! Tick cycle, operator controls, and snapshot broadcast for the Snake
//! simulation.
//!
//! A single background task owns the game state and advances it on a
//! fixed interval. Input surfaces change the heading through [`Controls`];
//! renderers read frames through a [`Subscription`].
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `snake-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- The shared direction and the [`Controls`] handle.
//! - [`food`] -- [`FoodSource`] trait, [`RandomFood`] and [`ScriptedFood`].
//! - [`operator`] -- Pause, resume, speed, and stop controls.
//! - [`runner`] -- The async tick loop.
//! - [`simulation`] -- [`Simulation`] handle and [`Subscription`].
//! - [`tick`] -- The single tick step over [`GameState`].
//!
//! [`Controls`]: control::Controls
//! [`FoodSource`]: food::FoodSource
//! [`RandomFood`]: food::RandomFood
//! [`ScriptedFood`]: food::ScriptedFood
//! [`Simulation`]: simulation::Simulation
//! [`Subscription`]: simulation::Subscription
//! [`GameState`]: tick::GameState

pub mod config;
pub mod control;
pub mod food;
pub mod operator;
pub mod runner;
pub mod simulation;
pub mod tick;

pub use simulation::{Simulation, SimulationError, Subscription};
