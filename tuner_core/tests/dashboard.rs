use rstest::rstest;
use tuner_core::labels::{CLOSED_LOOP_CONTROL, IDLE, VELOCITY_CONTROL};
use tuner_core::{Dashboard, Direction, Event, TunerError, View};
use tuner_hardware::{SimSettings, SimulatedController, codes};
use tuner_traits::{DeviceIdentity, DeviceResult, FwVersion, MotorController, Param};

fn dashboard() -> Dashboard<SimulatedController> {
    let mut dash = Dashboard::new(SimulatedController::default());
    dash.handle(&Event::Refresh).unwrap();
    dash
}

fn shortcut_labels(view: &View, axis: usize) -> Vec<String> {
    view.axes[axis]
        .shortcuts
        .iter()
        .map(|a| a.label.clone())
        .collect()
}

#[test]
fn switch_to_closed_loop_scenario() {
    let mut dash = dashboard();
    assert_eq!(dash.session().axis_state(0), IDLE);

    let view = dash
        .handle(&Event::SwitchTo {
            axis: 0,
            state: CLOSED_LOOP_CONTROL,
        })
        .unwrap();

    assert_eq!(dash.session().axis_state(0), 8);
    let dev = dash.device_mut();
    assert_eq!(dev.requested_state(0).unwrap(), 8);
    assert_eq!(dev.current_state(0).unwrap(), 8);
    assert_eq!(view.axes[0].state.selected_label, "closed loop control");
}

#[rstest]
#[case(0, Param::PosGain, 42.5)]
#[case(1, Param::VelGain, 0.0)]
#[case(0, Param::VelIntegratorGain, 1.25)]
#[case(1, Param::VelLimit, 15.0)]
fn param_edits_reach_session_and_device(
    #[case] axis: usize,
    #[case] param: Param,
    #[case] value: f32,
) {
    let mut dash = dashboard();
    let view = dash.handle(&Event::SetParam { axis, param, value }).unwrap();
    assert_eq!(dash.session().param(axis, param), value);
    assert_eq!(dash.device_mut().param(axis, param).unwrap(), value);
    let widget = view.axes[axis]
        .settings
        .iter()
        .find(|w| w.label == param.name())
        .unwrap();
    assert_eq!(widget.value, value);
    assert_eq!(widget.min, 0.0);
}

#[test]
fn idle_shortcut_visibility_follows_selection() {
    let mut dash = dashboard();
    let view = dash.handle(&Event::Refresh).unwrap();
    assert_eq!(
        shortcut_labels(&view, 0),
        ["Switch to \"closed loop control\" state"]
    );

    let view = dash
        .handle(&Event::SelectState {
            axis: 0,
            state: codes::SENSORLESS_CONTROL,
        })
        .unwrap();
    assert_eq!(
        shortcut_labels(&view, 0),
        [
            "Switch to \"idle\" state",
            "Switch to \"closed loop control\" state"
        ]
    );

    dash.handle(&Event::SwitchTo { axis: 0, state: IDLE }).unwrap();
    assert_eq!(dash.session().axis_state(0), IDLE);
    assert_eq!(dash.device_mut().requested_state(0).unwrap(), IDLE);
}

#[test]
fn velocity_panel_appears_in_velocity_mode() {
    let mut dash = dashboard();
    let view = dash.handle(&Event::Refresh).unwrap();
    assert!(view.axes[1].velocity.is_none());

    dash.handle(&Event::SelectMode {
        axis: 1,
        mode: VELOCITY_CONTROL,
    })
    .unwrap();
    assert_eq!(
        dash.device_mut().control_mode(1).unwrap(),
        codes::VELOCITY_CONTROL
    );
    dash.handle(&Event::SetMagnitude(2.5)).unwrap();
    let view = dash
        .handle(&Event::CommandVelocity {
            axis: 1,
            direction: Direction::Negative,
        })
        .unwrap();

    let panel = view.axes[1].velocity.as_ref().unwrap();
    assert_eq!(panel.input_vel, -2.5);
    assert_eq!(panel.magnitude.value, 2.5);
    let labels: Vec<_> = panel.actions.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Set input_vel = -2.5",
            "Set input_vel = 0.0",
            "Set input_vel = 2.5"
        ]
    );
    assert_eq!(dash.device_mut().input_vel(1).unwrap(), -2.5);
    assert!(view.axes[0].velocity.is_none());
}

#[test]
fn sidebar_shows_identity_and_voltage() {
    let mut dev = SimulatedController::new(SimSettings {
        serial_number: 0x3057_3146_3034,
        fw_version: FwVersion {
            major: 0,
            minor: 5,
            revision: 4,
            unreleased: true,
        },
        ..SimSettings::default()
    });
    dev.set_vbus_voltage(23.876);
    let mut dash = Dashboard::new(dev);
    let view = dash.handle(&Event::Refresh).unwrap();

    assert_eq!(view.sidebar.serial_number, "305731463034");
    assert_eq!(view.sidebar.hardware_version, "3.6.56");
    assert_eq!(view.sidebar.firmware_version, "0.5.4 (dev)");
    assert_eq!(view.sidebar.voltage, 23.88);
    let actions: Vec<_> = view.sidebar.actions.iter().map(|a| a.event.clone()).collect();
    assert_eq!(
        actions,
        [Event::ClearErrors, Event::SaveConfiguration, Event::Reboot]
    );
}

#[test]
fn clear_errors_dumps_then_clears() {
    let mut dash = dashboard();
    dash.device_mut().inject_error(1, 0x800).unwrap();
    let view = dash.handle(&Event::Refresh).unwrap();
    assert_eq!(view.axes[0].error, None);
    assert_eq!(view.axes[1].error.as_deref(), Some("0x800"));

    let view = dash.handle(&Event::ClearErrors).unwrap();
    assert_eq!(view.notice.as_deref(), Some("Cleared errors: axis1: 0x800"));
    assert_eq!(view.axes[1].error, None);

    let view = dash.handle(&Event::ClearErrors).unwrap();
    assert_eq!(view.notice.as_deref(), Some("No errors"));
}

#[test]
fn failed_refresh_does_not_commit_session() {
    let mut dash = dashboard();
    dash.handle(&Event::SwitchTo {
        axis: 1,
        state: CLOSED_LOOP_CONTROL,
    })
    .unwrap();
    let before = dash.session().clone();

    // The simulated device refuses to save while an axis is running.
    let err = dash.handle(&Event::SaveConfiguration).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TunerError>(),
        Some(TunerError::DeviceFault(_))
    ));
    assert_eq!(dash.session(), &before);

    dash.device_mut().disconnect();
    let err = dash
        .handle(&Event::SetParam {
            axis: 0,
            param: Param::PosGain,
            value: 99.0,
        })
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<TunerError>(),
        Some(&TunerError::Disconnected)
    );
    assert_eq!(dash.session().param(0, Param::PosGain), 20.0);
}

/// Simulated device whose bus voltage reading can be made to fail.
struct FlakyVoltage {
    inner: SimulatedController,
    vbus_down: bool,
}

impl MotorController for FlakyVoltage {
    fn axis_error(&mut self, axis: usize) -> DeviceResult<u32> {
        self.inner.axis_error(axis)
    }
    fn current_state(&mut self, axis: usize) -> DeviceResult<u8> {
        self.inner.current_state(axis)
    }
    fn requested_state(&mut self, axis: usize) -> DeviceResult<u8> {
        self.inner.requested_state(axis)
    }
    fn set_requested_state(&mut self, axis: usize, state: u8) -> DeviceResult<()> {
        self.inner.set_requested_state(axis, state)
    }
    fn control_mode(&mut self, axis: usize) -> DeviceResult<u8> {
        self.inner.control_mode(axis)
    }
    fn set_control_mode(&mut self, axis: usize, mode: u8) -> DeviceResult<()> {
        self.inner.set_control_mode(axis, mode)
    }
    fn param(&mut self, axis: usize, param: Param) -> DeviceResult<f32> {
        self.inner.param(axis, param)
    }
    fn set_param(&mut self, axis: usize, param: Param, value: f32) -> DeviceResult<()> {
        self.inner.set_param(axis, param, value)
    }
    fn input_vel(&mut self, axis: usize) -> DeviceResult<f32> {
        self.inner.input_vel(axis)
    }
    fn set_input_vel(&mut self, axis: usize, vel: f32) -> DeviceResult<()> {
        self.inner.set_input_vel(axis, vel)
    }
    fn identity(&mut self) -> DeviceResult<DeviceIdentity> {
        self.inner.identity()
    }
    fn vbus_voltage(&mut self) -> DeviceResult<f32> {
        if self.vbus_down {
            return Err(std::io::Error::other("vbus read timed out").into());
        }
        self.inner.vbus_voltage()
    }
    fn clear_errors(&mut self) -> DeviceResult<()> {
        self.inner.clear_errors()
    }
    fn save_configuration(&mut self) -> DeviceResult<()> {
        self.inner.save_configuration()
    }
    fn reboot(&mut self) -> DeviceResult<()> {
        self.inner.reboot()
    }
}

#[test]
fn written_edit_is_kept_when_telemetry_fails() {
    let mut dash = Dashboard::new(FlakyVoltage {
        inner: SimulatedController::default(),
        vbus_down: false,
    });
    dash.handle(&Event::Refresh).unwrap();

    dash.device_mut().vbus_down = true;
    let err = dash
        .handle(&Event::SetParam {
            axis: 0,
            param: Param::VelLimit,
            value: 9.0,
        })
        .unwrap_err();
    assert_eq!(err.downcast_ref::<TunerError>(), Some(&TunerError::Timeout));
    assert_eq!(dash.device_mut().param(0, Param::VelLimit).unwrap(), 9.0);
    assert_eq!(dash.session().param(0, Param::VelLimit), 9.0);

    dash.device_mut().vbus_down = false;
    let view = dash.handle(&Event::Refresh).unwrap();
    let widget = view.axes[0]
        .settings
        .iter()
        .find(|w| w.label == "vel_limit")
        .unwrap();
    assert_eq!(widget.value, 9.0);
}

#[test]
fn save_and_reboot_report_notices() {
    let mut dash = dashboard();
    dash.handle(&Event::SetParam {
        axis: 0,
        param: Param::VelLimit,
        value: 6.0,
    })
    .unwrap();
    let view = dash.handle(&Event::SaveConfiguration).unwrap();
    assert_eq!(view.notice.as_deref(), Some("Configuration saved"));
    assert_eq!(dash.device().save_count(), 1);

    let view = dash.handle(&Event::Reboot).unwrap();
    assert_eq!(view.notice.as_deref(), Some("Device rebooted"));
    assert_eq!(dash.device_mut().param(0, Param::VelLimit).unwrap(), 6.0);
    // The session keeps what the operator last entered.
    assert_eq!(dash.session().param(0, Param::VelLimit), 6.0);
}

#[test]
fn view_serializes_without_events() {
    let mut dash = dashboard();
    let view = dash.handle(&Event::Refresh).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["axes"][0]["header"], "Axis 0");
    assert_eq!(json["axes"][0]["mode"]["selected"], 3);
    assert_eq!(json["axes"][0]["mode"]["selected_label"], "position control");
    assert_eq!(json["axes"][1]["settings"][0]["label"], "pos_gain");
    assert_eq!(json["sidebar"]["actions"][0]["label"], "Clear errors");
    assert!(json["sidebar"]["actions"][0].get("event").is_none());
    assert!(json["notice"].is_null());
}

#[test]
fn unresponsive_device_fails_with_timeout() {
    let mut dash = dashboard();
    dash.device_mut().stall();
    let err = dash.handle(&Event::Refresh).unwrap_err();
    assert_eq!(err.downcast_ref::<TunerError>(), Some(&TunerError::Timeout));

    dash.device_mut().resume();
    assert!(dash.handle(&Event::Refresh).is_ok());
}
