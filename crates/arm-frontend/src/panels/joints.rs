//! Joint setpoint sliders

use arm_core::{JointBinding, JointSetpoint};

/// One slider per joint. Returns true if any setpoint changed.
pub fn joints_panel(
    ui: &mut egui::Ui,
    joints: &mut [JointSetpoint],
    bindings: Option<&[JointBinding]>,
) -> bool {
    ui.heading("Joints");
    ui.separator();

    let mut changed = false;
    for (index, joint) in joints.iter_mut().enumerate() {
        let axis = bindings
            .and_then(|b| b.iter().find(|binding| binding.index == index))
            .map(|binding| binding.axis.display_name());

        ui.horizontal(|ui| {
            match axis {
                Some(axis) => ui.label(format!("{} ({})", joint.name, axis)),
                None => ui.label(&joint.name),
            };
        });

        let mut degrees = joint.set_point;
        let response = ui.add(
            egui::Slider::new(&mut degrees, joint.min..=joint.max)
                .suffix("°")
                .fixed_decimals(1),
        );
        if response.changed() {
            joint.set(degrees);
            changed = true;
        }

        if ui.small_button("Zero").clicked() {
            joint.set(0.0);
            changed = true;
        }
        ui.add_space(4.0);
    }

    if joints.is_empty() {
        ui.weak("No joints configured");
    }

    changed
}
