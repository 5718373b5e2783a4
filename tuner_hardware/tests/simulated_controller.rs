use rstest::rstest;
use tuner_hardware::codes;
use tuner_hardware::error::HwError;
use tuner_hardware::{SimSettings, SimulatedController};
use tuner_traits::{MotorController, Param};

fn hw_err(e: &tuner_traits::DeviceError) -> &HwError {
    e.downcast_ref::<HwError>().expect("HwError behind the trait boundary")
}

#[rstest]
#[case(codes::IDLE, codes::IDLE)]
#[case(codes::CLOSED_LOOP_CONTROL, codes::CLOSED_LOOP_CONTROL)]
#[case(codes::SENSORLESS_CONTROL, codes::SENSORLESS_CONTROL)]
#[case(codes::FULL_CALIBRATION_SEQUENCE, codes::IDLE)]
#[case(codes::MOTOR_CALIBRATION, codes::IDLE)]
#[case(codes::ENCODER_OFFSET_CALIBRATION, codes::IDLE)]
#[case(codes::HOMING, codes::IDLE)]
fn requested_state_settles(#[case] requested: u8, #[case] settled: u8) {
    let mut dev = SimulatedController::default();
    dev.set_requested_state(1, requested).unwrap();
    assert_eq!(dev.requested_state(1).unwrap(), requested);
    assert_eq!(dev.current_state(1).unwrap(), settled);
}

#[test]
fn undefined_request_keeps_current_state() {
    let mut dev = SimulatedController::default();
    dev.set_requested_state(0, codes::CLOSED_LOOP_CONTROL).unwrap();
    dev.set_requested_state(0, codes::UNDEFINED).unwrap();
    assert_eq!(dev.current_state(0).unwrap(), codes::CLOSED_LOOP_CONTROL);
}

#[test]
fn erroring_axis_refuses_closed_loop() {
    let mut dev = SimulatedController::default();
    dev.inject_error(0, 0x40).unwrap();
    dev.set_requested_state(0, codes::CLOSED_LOOP_CONTROL).unwrap();
    assert_eq!(dev.current_state(0).unwrap(), codes::IDLE);

    dev.clear_errors().unwrap();
    assert_eq!(dev.axis_error(0).unwrap(), 0);
    dev.set_requested_state(0, codes::CLOSED_LOOP_CONTROL).unwrap();
    assert_eq!(dev.current_state(0).unwrap(), codes::CLOSED_LOOP_CONTROL);
}

#[test]
fn invalid_codes_are_rejected() {
    let mut dev = SimulatedController::default();
    let err = dev.set_requested_state(0, codes::STATE_COUNT).unwrap_err();
    assert!(matches!(hw_err(&err), HwError::InvalidCode { what: "axis state", .. }));
    let err = dev.set_control_mode(0, codes::MODE_COUNT).unwrap_err();
    assert!(matches!(hw_err(&err), HwError::InvalidCode { what: "control mode", .. }));
}

#[test]
fn save_requires_idle_axes() {
    let mut dev = SimulatedController::default();
    dev.set_requested_state(1, codes::CLOSED_LOOP_CONTROL).unwrap();
    let err = dev.save_configuration().unwrap_err();
    assert!(matches!(hw_err(&err), HwError::NotIdle(1)));
    assert_eq!(dev.save_count(), 0);

    dev.set_requested_state(1, codes::IDLE).unwrap();
    dev.save_configuration().unwrap();
    assert_eq!(dev.save_count(), 1);
}

#[test]
fn reboot_restores_saved_configuration() {
    let mut dev = SimulatedController::new(SimSettings {
        vel_limit: 5.0,
        ..SimSettings::default()
    });
    dev.set_param(0, Param::VelLimit, 9.0).unwrap();
    dev.save_configuration().unwrap();
    dev.set_param(0, Param::VelLimit, 12.0).unwrap();
    dev.set_param(1, Param::VelGain, 1.5).unwrap();
    dev.set_requested_state(0, codes::CLOSED_LOOP_CONTROL).unwrap();
    dev.set_input_vel(0, 3.0).unwrap();

    dev.reboot().unwrap();

    assert_eq!(dev.param(0, Param::VelLimit).unwrap(), 9.0);
    assert_eq!(dev.param(1, Param::VelGain).unwrap(), 0.16);
    assert_eq!(dev.current_state(0).unwrap(), codes::IDLE);
    assert_eq!(dev.input_vel(0).unwrap(), 0.0);
    assert_eq!(dev.reboot_count(), 1);
}

#[test]
fn disconnected_device_fails_every_call() {
    let mut dev = SimulatedController::default();
    dev.disconnect();
    assert!(matches!(hw_err(&dev.vbus_voltage().unwrap_err()), HwError::Disconnected));
    assert!(matches!(hw_err(&dev.param(0, Param::PosGain).unwrap_err()), HwError::Disconnected));
    assert!(matches!(hw_err(&dev.reboot().unwrap_err()), HwError::Disconnected));
}

#[test]
fn stalled_device_times_out_until_resumed() {
    let mut dev = SimulatedController::default();
    dev.stall();
    assert!(matches!(hw_err(&dev.identity().unwrap_err()), HwError::Timeout));
    assert!(matches!(
        hw_err(&dev.set_param(0, Param::VelLimit, 3.0).unwrap_err()),
        HwError::Timeout
    ));
    dev.resume();
    assert_eq!(dev.param(0, Param::VelLimit).unwrap(), 2.0);
}
