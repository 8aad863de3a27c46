//! Session lifecycle and the per-frame scheduler.
//!
//! A [`Session`] owns every piece of per-flight state: intents, key and
//! gesture tracking, the two joystick widgets, the flight model, the camera
//! rig, pending deferred actions and the telemetry tracker. It exists only
//! between [`SessionHost::start`] and [`SessionHost::end`].
//!
//! Each displayed frame runs [`Session::frame`] exactly once, in this order:
//!
//! 1. drain commands sent through the [`ControlBridge`];
//! 2. release intent pulses whose window has ended;
//! 3. mirror held keys and gamepad sticks onto the joystick widgets;
//! 4. integrate the flight model;
//! 5. move the camera rig to the ship;
//! 6. sample telemetry and publish it when it changed.
//!
//! Window events (keys, pointers, wheel) are applied as they arrive, before
//! the frame that consumes them.

use std::collections::HashSet;
use std::time::Duration;

use glam::Vec2;
use orrery_config::{Config, TelemetryConfig};
use orrery_control::{
    CameraCommand, CommandReceiver, ControlBridge, ControlCommand, IntentPulses, ShipCommand,
};
use orrery_input::{
    Action, GamepadAxes, GamepadState, GestureEvent, GestureTracker, InputMap, Intent,
    IntentState, JoystickGeometry, JoystickKind, JoystickWidget, KeyboardState, PointerId,
    RawKeyEvent, UnifiedButton, stick_to_offset,
};
use orrery_player::{
    CameraPose, CameraRig, CameraSettings, FlightModel, FlightTuning, ShipKinematics,
};
use orrery_telemetry::{TelemetryFeed, TelemetrySnapshot, TelemetryTracker};
use tracing::{debug, info, instrument, trace};
use winit::event::ElementState;

use crate::layout::WidgetLayout;

/// Everything a session is built from, resolved once from [`Config`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub flight: FlightTuning,
    pub camera: CameraSettings,
    pub ship_geometry: JoystickGeometry,
    pub camera_geometry: JoystickGeometry,
    pub camera_feed_scale: f32,
    /// Curved ship joystick magnitude that engages a steering intent.
    pub intent_threshold: f32,
    /// Synthetic knob offset per axis while a steering key is held.
    pub keyboard_step: f32,
    pub start_position: glam::Vec3,
    pub telemetry: TelemetryConfig,
    pub bindings: InputMap,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SessionSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let joystick = &config.joystick;
        Self {
            flight: FlightTuning::from(&config.flight),
            camera: CameraSettings::from_config(&config.camera, &config.input),
            ship_geometry: JoystickGeometry {
                radius: joystick.radius,
                knob_margin: joystick.ship_knob_margin,
                dead_zone: joystick.dead_zone,
                tilt_degrees: joystick.ship_tilt_degrees,
            },
            camera_geometry: JoystickGeometry {
                radius: joystick.radius,
                knob_margin: joystick.camera_knob_margin,
                dead_zone: joystick.dead_zone,
                tilt_degrees: joystick.camera_tilt_degrees,
            },
            camera_feed_scale: joystick.camera_feed_scale,
            intent_threshold: joystick.intent_threshold,
            keyboard_step: joystick.keyboard_step,
            start_position: glam::Vec3::from_array(config.flight.start_position),
            telemetry: config.telemetry.clone(),
            bindings: InputMap::default_flight().with_overrides(&config.input.keybindings),
        }
    }
}

/// What one call to [`Session::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Bridge commands applied this frame.
    pub commands: usize,
    /// Time step the flight model integrated, after its cap.
    pub step: f32,
    /// Camera pose for rendering, once the rig is attached.
    pub pose: Option<CameraPose>,
    pub telemetry_changed: bool,
}

/// Work undone when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Teardown {
    pub frames: u64,
    /// Deferred actions cancelled before they fired.
    pub cancelled_actions: usize,
    /// Pointer listeners detached from gestures still in progress.
    pub detached_listeners: usize,
}

pub struct Session {
    intent: IntentState,
    keyboard: KeyboardState,
    bindings: InputMap,
    ship_stick: JoystickWidget,
    camera_stick: JoystickWidget,
    gestures: GestureTracker,
    layout: WidgetLayout,
    flight: FlightModel,
    camera: CameraRig,
    pulses: IntentPulses,
    commands: CommandReceiver,
    telemetry: TelemetryTracker,
    feed: TelemetryFeed,
    intent_threshold: f32,
    keyboard_step: f32,
    pad: GamepadAxes,
    pad_buttons: HashSet<UnifiedButton>,
    pad_steering: bool,
    elapsed: Duration,
    frames: u64,
}

impl Session {
    fn new(
        settings: &SessionSettings,
        commands: CommandReceiver,
        feed: TelemetryFeed,
        layout: WidgetLayout,
    ) -> Self {
        Self {
            intent: IntentState::new(),
            keyboard: KeyboardState::new(),
            bindings: settings.bindings.clone(),
            ship_stick: JoystickWidget::new(JoystickKind::Ship, settings.ship_geometry, 1.0),
            camera_stick: JoystickWidget::new(
                JoystickKind::Camera,
                settings.camera_geometry,
                settings.camera_feed_scale,
            ),
            gestures: GestureTracker::new(),
            layout,
            flight: FlightModel::new(
                settings.flight,
                ShipKinematics::facing_origin(settings.start_position),
            ),
            camera: CameraRig::new(settings.camera),
            pulses: IntentPulses::default(),
            commands,
            telemetry: TelemetryTracker::new(&settings.telemetry),
            feed,
            intent_threshold: settings.intent_threshold,
            keyboard_step: settings.keyboard_step,
            pad: GamepadAxes::default(),
            pad_buttons: HashSet::new(),
            pad_steering: false,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Tell the camera rig the ship now exists. Only the first call has any
    /// effect.
    pub fn attach_camera(&mut self) -> bool {
        self.camera.on_target_attached(self.flight.position())
    }

    /// Run one frame. `dt` is the measured frame time.
    pub fn frame(&mut self, dt: Duration) -> FrameReport {
        self.elapsed += dt;

        let commands = self.drain_commands();

        let released = self.pulses.fire_due(self.elapsed, &mut self.intent);
        if !released.is_empty() {
            trace!(?released, "Intent pulses released");
        }

        self.mirror_joysticks();

        let step = self.flight.tick(&self.intent, dt.as_secs_f32());
        let position = self.flight.position();
        let pose = self.camera.tick(position);

        let telemetry_changed = self.telemetry.tick(position, self.elapsed);
        if telemetry_changed {
            self.feed.publish(self.telemetry.snapshot());
        }

        self.frames += 1;

        FrameReport {
            commands,
            step,
            pose,
            telemetry_changed,
        }
    }

    /// Apply a control key event. Returns `true` if a key changed state.
    pub fn handle_key(&mut self, event: RawKeyEvent) -> bool {
        if !self.keyboard.process_raw(event) {
            return false;
        }
        if let Some(action) = self.bindings.action_for_key(event.key) {
            self.apply_action(action, event.state == ElementState::Pressed);
        }
        true
    }

    /// Release every held key, e.g. when the window loses focus.
    pub fn release_keys(&mut self) {
        for key in self.keyboard.release_all() {
            if let Some(action) = self.bindings.action_for_key(key) {
                self.apply_action(action, false);
            }
        }
    }

    pub fn pointer_down(&mut self, pointer: PointerId, position: Vec2) {
        let (target, anchor) = self.layout.hit(position);
        if let Some(event) = self.gestures.begin(pointer, target, anchor, position) {
            self.apply_gesture(event);
        }
    }

    pub fn pointer_moved(&mut self, pointer: PointerId, position: Vec2) {
        if let Some(event) = self.gestures.moved(pointer, position) {
            self.apply_gesture(event);
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId) {
        if let Some(event) = self.gestures.release(pointer) {
            self.apply_gesture(event);
        }
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        if let Some(event) = self.gestures.cancel(pointer) {
            self.apply_gesture(event);
        }
    }

    /// Cancel every gesture in progress.
    pub fn cancel_gestures(&mut self) {
        for event in self.gestures.cancel_all() {
            self.apply_gesture(event);
        }
    }

    /// Wheel zoom in lines; positive zooms in. Returns `false` if the event
    /// was dropped by the camera's rate limit.
    pub fn wheel(&mut self, lines: f32) -> bool {
        self.camera.zoom_wheel(lines, self.elapsed)
    }

    /// Take this frame's gamepad input. `None` means no pad is connected.
    ///
    /// Button edges are applied immediately; stick values are kept for the
    /// mirroring step of the next frame.
    pub fn apply_gamepad(&mut self, pad: Option<&GamepadState>) {
        let Some(pad) = pad else {
            self.pad = GamepadAxes::default();
            let held: Vec<UnifiedButton> = self.pad_buttons.drain().collect();
            for button in held {
                if let Some(action) = self.bindings.action_for_button(button) {
                    self.apply_action(action, false);
                }
            }
            return;
        };

        self.pad = GamepadAxes {
            left_stick: pad.left_stick(),
            right_stick: pad.right_stick(),
        };
        for (button, pressed) in pad.button_edges() {
            if pressed {
                self.pad_buttons.insert(button);
            } else {
                self.pad_buttons.remove(&button);
            }
            if let Some(action) = self.bindings.action_for_button(button) {
                self.apply_action(action, pressed);
            }
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.layout.resize(viewport);
    }

    #[must_use]
    pub fn intent(&self) -> &IntentState {
        &self.intent
    }

    #[must_use]
    pub fn flight(&self) -> &FlightModel {
        &self.flight
    }

    #[must_use]
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    #[must_use]
    pub fn joystick(&self, kind: JoystickKind) -> &JoystickWidget {
        match kind {
            JoystickKind::Ship => &self.ship_stick,
            JoystickKind::Camera => &self.camera_stick,
        }
    }

    #[must_use]
    pub fn telemetry(&self) -> &TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    /// Session clock: the sum of all frame times so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Pointer listeners currently attached by live gestures.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.gestures.listener_count()
    }

    /// Deferred actions waiting to fire.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.pulses.pending()
    }

    fn teardown(mut self) -> Teardown {
        let detached_listeners = self.gestures.listener_count();
        self.cancel_gestures();
        let cancelled_actions = self.pulses.clear();
        self.feed.clear();
        Teardown {
            frames: self.frames,
            cancelled_actions,
            detached_listeners,
        }
    }

    fn drain_commands(&mut self) -> usize {
        let commands: Vec<ControlCommand> = self.commands.drain().collect();
        for &command in &commands {
            self.apply_command(command);
        }
        commands.len()
    }

    fn apply_command(&mut self, command: ControlCommand) {
        trace!(?command, "Applying control command");
        match command {
            ControlCommand::Ship(ship) => match ship {
                ShipCommand::SetIntent { intent, active } => {
                    self.intent
                        .set(intent, active || self.held_by_input(intent));
                }
                ShipCommand::Pulse(intent) => {
                    self.pulses.pulse(intent, self.elapsed, &mut self.intent);
                }
                ShipCommand::Joystick(v) => self.intent.apply_joystick(v, self.intent_threshold),
                ShipCommand::JoystickReleased => self.release_steering(),
            },
            ControlCommand::Camera(camera) => match camera {
                CameraCommand::ZoomIn => self.camera.zoom_in(),
                CameraCommand::ZoomOut => self.camera.zoom_out(),
                CameraCommand::Wheel(lines) => {
                    self.camera.zoom_wheel(lines, self.elapsed);
                }
                CameraCommand::RotateBy { dx, dy } => self.camera.rotate(dx, dy),
                CameraCommand::Joystick(v) => self.camera.update_joystick(v),
                CameraCommand::Reset => self.camera.reset(),
            },
        }
    }

    /// Held actions set or clear their intent; one-shot actions fire on
    /// press. Camera nudges are read from the held keys every frame.
    ///
    /// A released action leaves its intent set while another held key or
    /// pad button is bound to the same intent.
    fn apply_action(&mut self, action: Action, pressed: bool) {
        if let Some(intent) = action.intent() {
            self.intent.set(intent, pressed || self.held_by_input(intent));
            return;
        }
        if !pressed {
            return;
        }
        match action {
            Action::ZoomIn => self.camera.zoom_in(),
            Action::ZoomOut => self.camera.zoom_out(),
            Action::ResetCamera => self.camera.reset(),
            _ => {}
        }
    }

    fn apply_gesture(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Joystick {
                kind: JoystickKind::Ship,
                raw,
            } => {
                let v = self.ship_stick.update(raw);
                self.intent.apply_joystick(v, self.intent_threshold);
            }
            GestureEvent::Joystick {
                kind: JoystickKind::Camera,
                raw,
            } => {
                let feed = self.camera_stick.update(raw);
                self.camera.update_joystick(feed);
            }
            GestureEvent::JoystickReleased(JoystickKind::Ship) => {
                self.ship_stick.recenter();
                self.release_steering();
            }
            GestureEvent::JoystickReleased(JoystickKind::Camera) => self.camera_stick.recenter(),
            GestureEvent::Orbit { delta } => self.camera.drag(delta),
        }
    }

    /// Whether a held key or pad button is bound to `intent`.
    fn held_by_input(&self, intent: Intent) -> bool {
        let keys = self
            .keyboard
            .held()
            .filter_map(|key| self.bindings.action_for_key(key));
        let buttons = self
            .pad_buttons
            .iter()
            .filter_map(|&button| self.bindings.action_for_button(button));
        keys.chain(buttons)
            .any(|action| action.intent() == Some(intent))
    }

    /// Clear the steering intents a joystick set, then let steering keys
    /// that are still held claim theirs back.
    fn release_steering(&mut self) {
        self.intent.clear_steering();
        let held: Vec<Action> = self
            .keyboard
            .held()
            .filter_map(|key| self.bindings.action_for_key(key))
            .collect();
        for action in held {
            if action.ship_nudge().is_some()
                && let Some(intent) = action.intent()
            {
                self.intent.set(intent, true);
            }
        }
    }

    /// Sum of the unit nudges of every held key: (ship, camera).
    fn held_nudges(&self) -> (Vec2, Vec2) {
        let mut ship = Vec2::ZERO;
        let mut camera = Vec2::ZERO;
        for key in self.keyboard.held() {
            let Some(action) = self.bindings.action_for_key(key) else {
                continue;
            };
            ship += action.ship_nudge().unwrap_or(Vec2::ZERO);
            camera += action.camera_nudge().unwrap_or(Vec2::ZERO);
        }
        (ship, camera)
    }

    /// Drive widgets no pointer owns from held keys or gamepad sticks, and
    /// return idle widgets to centre.
    ///
    /// Steering keys already set their intents when pressed, so the ship
    /// knob only mirrors them. A gamepad stick steers through the same
    /// joystick mapping a pointer would. Camera input from either source
    /// feeds the rig every frame it is held.
    fn mirror_joysticks(&mut self) {
        let (ship_keys, camera_keys) = self.held_nudges();
        let step = self.keyboard_step;

        if !self.gestures.owns(JoystickKind::Ship) {
            let max = self.ship_stick.geometry().max_distance();
            let pad_raw = stick_to_offset(self.pad.left_stick, max);
            if pad_raw != Vec2::ZERO {
                let v = self.ship_stick.update(pad_raw);
                self.intent.apply_joystick(v, self.intent_threshold);
                self.pad_steering = true;
            } else {
                if self.pad_steering {
                    self.pad_steering = false;
                    self.release_steering();
                }
                if ship_keys != Vec2::ZERO {
                    self.ship_stick.update(ship_keys * step);
                } else {
                    self.ship_stick.recenter();
                }
            }
        }

        if !self.gestures.owns(JoystickKind::Camera) {
            let raw = if camera_keys != Vec2::ZERO {
                camera_keys * step
            } else {
                let max = self.camera_stick.geometry().max_distance();
                stick_to_offset(self.pad.right_stick, max)
            };
            if raw != Vec2::ZERO {
                let feed = self.camera_stick.update(raw);
                self.camera.update_joystick(feed);
            } else {
                self.camera_stick.recenter();
            }
        }
    }
}

/// Starts and ends sessions and routes window input to the live one.
///
/// The host owns the [`ControlBridge`] and the [`TelemetryFeed`]; clones of
/// either can be handed to UI code before any session exists. Every routing
/// method is a no-op while no session is running.
pub struct SessionHost {
    settings: SessionSettings,
    bridge: ControlBridge,
    feed: TelemetryFeed,
    layout: WidgetLayout,
    session: Option<Session>,
}

impl SessionHost {
    #[must_use]
    pub fn new(settings: SessionSettings, viewport: Vec2) -> Self {
        let layout = WidgetLayout::new(viewport, settings.ship_geometry.radius);
        Self {
            settings,
            bridge: ControlBridge::new(),
            feed: TelemetryFeed::new(),
            layout,
            session: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let viewport = Vec2::new(config.window.width as f32, config.window.height as f32);
        Self::new(SessionSettings::from_config(config), viewport)
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn bridge(&self) -> &ControlBridge {
        &self.bridge
    }

    #[must_use]
    pub fn feed(&self) -> &TelemetryFeed {
        &self.feed
    }

    #[must_use]
    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Start a session: open the bridge and attach the camera to the newly
    /// spawned ship. Returns `false` if a session is already running.
    #[instrument(skip_all)]
    pub fn start(&mut self) -> bool {
        if self.session.is_some() {
            debug!("Session already running");
            return false;
        }
        let commands = self.bridge.open();
        let mut session = Session::new(&self.settings, commands, self.feed.clone(), self.layout);
        session.attach_camera();
        info!(position = ?session.flight().position(), "Session started");
        self.session = Some(session);
        true
    }

    /// End the running session: close the bridge, cancel deferred actions,
    /// detach gesture listeners and clear the telemetry feed.
    #[instrument(skip_all)]
    pub fn end(&mut self) -> Option<Teardown> {
        let session = self.session.take()?;
        self.bridge.close();
        let teardown = session.teardown();
        info!(
            frames = teardown.frames,
            cancelled_actions = teardown.cancelled_actions,
            detached_listeners = teardown.detached_listeners,
            "Session ended"
        );
        Some(teardown)
    }

    /// Route a key event. Start and end keys are handled here; everything
    /// else goes to the running session.
    pub fn handle_key(&mut self, event: RawKeyEvent) -> bool {
        let pressed = event.state == ElementState::Pressed && !event.repeat;
        match self.settings.bindings.action_for_key(event.key) {
            Some(Action::StartSession) if pressed => self.start(),
            Some(Action::EndSession) if pressed => self.end().is_some(),
            _ => self
                .session
                .as_mut()
                .is_some_and(|session| session.handle_key(event)),
        }
    }

    /// Run one frame of the live session.
    pub fn frame(&mut self, dt: Duration) -> Option<FrameReport> {
        self.session.as_mut().map(|session| session.frame(dt))
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.layout.resize(viewport);
        if let Some(session) = &mut self.session {
            session.set_viewport(viewport);
        }
    }

    pub fn pointer_down(&mut self, pointer: PointerId, position: Vec2) {
        if let Some(session) = &mut self.session {
            session.pointer_down(pointer, position);
        }
    }

    pub fn pointer_moved(&mut self, pointer: PointerId, position: Vec2) {
        if let Some(session) = &mut self.session {
            session.pointer_moved(pointer, position);
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId) {
        if let Some(session) = &mut self.session {
            session.pointer_up(pointer);
        }
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        if let Some(session) = &mut self.session {
            session.pointer_cancel(pointer);
        }
    }

    pub fn wheel(&mut self, lines: f32) {
        if let Some(session) = &mut self.session {
            session.wheel(lines);
        }
    }

    pub fn apply_gamepad(&mut self, pad: Option<&GamepadState>) {
        if let Some(session) = &mut self.session {
            session.apply_gamepad(pad);
        }
    }

    /// The window lost focus: no key-up or pointer-up will arrive for input
    /// that is currently held.
    pub fn focus_lost(&mut self) {
        if let Some(session) = &mut self.session {
            debug!("Focus lost; releasing held input");
            session.release_keys();
            session.cancel_gestures();
        }
    }
}
