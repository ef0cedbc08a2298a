use tracing::debug;

use plan_kernel::query::{find_closest_endpoint, find_closest_snap_point, hit_test};
use plan_kernel::DragSession;

use crate::editor_state::{BridgeError, EditorState};
use crate::messages::{plan_updated, KernelToUi, UiToKernel, WallView};

/// Dispatch a UI message against the editor state and return a response.
///
/// Never fails: edits the kernel refuses come back as `Rejected` with the
/// kernel's reason, misuse of the bridge itself as `Error`.
pub fn dispatch(state: &mut EditorState, msg: UiToKernel) -> KernelToUi {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(BridgeError::Edit(e)) => {
            debug!(reason = %e, "edit rejected");
            KernelToUi::Rejected {
                reason: e.to_string(),
            }
        }
        Err(e) => KernelToUi::Error {
            message: e.to_string(),
        },
    }
}

fn handle_message(state: &mut EditorState, msg: UiToKernel) -> Result<KernelToUi, BridgeError> {
    match msg {
        UiToKernel::Configure { config } => {
            state.configure(config)?;
            Ok(plan_updated(&state.plan))
        }

        // -- Drawing --
        UiToKernel::AddWall { start, end } => {
            state.edit(|plan| plan.add_wall(start, end))?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::AddRoom {
            name,
            height,
            walls,
        } => {
            state.edit(|plan| plan.add_room(&name, height, walls))?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::AddFixture {
            wall,
            position,
            width,
        } => {
            state.edit(|plan| plan.add_fixture(wall, position, width))?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::RemoveWall { wall } => {
            state.edit(|plan| plan.remove_wall(wall).map(|next| (next, ())))?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::RemoveRoom { room } => {
            state.edit(|plan| plan.remove_room(room).map(|next| (next, ())))?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::RemoveFixture { fixture } => {
            state.edit(|plan| plan.remove_fixture(fixture))?;
            Ok(plan_updated(&state.plan))
        }

        // -- Topology --
        UiToKernel::SplitWall { wall, point } => {
            state.edit(|plan| plan.split_wall(wall, point))?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::MergeWall { wall } => {
            state.edit(|plan| plan.merge_wall(wall))?;
            Ok(plan_updated(&state.plan))
        }

        // -- Pointer queries --
        UiToKernel::Snap {
            point,
            exclude,
            interior,
        } => {
            // Walls riding on a drag would snap onto the dragged vertex itself.
            let (plan, dragged) = match &state.drag {
                Some(session) => (session.preview(), session.walls()),
                None => (&state.plan, &[][..]),
            };
            let walls: Vec<_> = plan
                .wall_segments()
                .into_iter()
                .filter(|s| !dragged.contains(&s.id))
                .collect();
            let snap = if interior {
                find_closest_snap_point(point, &walls, exclude, plan.config())
            } else {
                find_closest_endpoint(point, &walls, exclude, plan.config())
            };
            Ok(KernelToUi::SnapFound { snap })
        }

        UiToKernel::HitTest { point } => {
            let plan = state.drag.as_ref().map_or(&state.plan, DragSession::preview);
            Ok(KernelToUi::HitFound {
                hit: hit_test(point, plan),
            })
        }

        // -- Endpoint drag --
        UiToKernel::BeginDrag { point } => {
            let session = state.begin_drag(point)?;
            Ok(drag_preview(session))
        }

        UiToKernel::DragTo { point } => {
            let session = state.drag_to(point)?;
            Ok(drag_preview(session))
        }

        UiToKernel::EndDrag => {
            state.end_drag()?;
            Ok(plan_updated(&state.plan))
        }

        UiToKernel::CancelDrag => {
            state.cancel_drag()?;
            Ok(plan_updated(&state.plan))
        }
    }
}

fn drag_preview(session: &DragSession) -> KernelToUi {
    let config = session.preview().config();
    KernelToUi::DragPreview {
        walls: session
            .preview_segments()
            .iter()
            .map(|s| WallView::new(s, config))
            .collect(),
    }
}
