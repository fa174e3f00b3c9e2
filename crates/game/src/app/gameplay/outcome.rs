/// Leaving the right edge of the view wins; touching the adversary loses.
fn judge_outcome(
    player: &RigidBody,
    adversary: &RigidBody,
    camera: &Camera2D,
) -> Option<MatchOutcome> {
    if player.position.x > camera.right_edge() {
        Some(MatchOutcome::PlayerWins)
    } else if player.overlaps(adversary) {
        Some(MatchOutcome::AdversaryWins)
    } else {
        None
    }
}
