//! Runner physics
//!
//! Fixed per-frame increments, deliberately not scaled by wall-clock time:
//! on a faster display the game runs faster.

use super::state::Player;
use crate::consts::{GRAVITY, JUMP_FORCE};

/// Start a jump if grounded; no double jumps
pub fn jump(player: &mut Player) {
    if player.is_jumping {
        return;
    }
    player.vel_y = JUMP_FORCE;
    player.is_jumping = true;
}

/// Advance one frame of gravity and land on the ground
pub fn step(player: &mut Player, ground_y: f32) {
    player.vel_y += GRAVITY;
    player.y += player.vel_y;

    if player.y >= ground_y {
        player.y = ground_y;
        player.vel_y = 0.0;
        player.is_jumping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROUND_Y;

    #[test]
    fn test_grounded_player_stays_put() {
        let mut p = Player::grounded(GROUND_Y);
        for _ in 0..10 {
            step(&mut p, GROUND_Y);
        }
        assert_eq!(p.y, GROUND_Y);
        assert_eq!(p.vel_y, 0.0);
        assert!(!p.is_jumping);
    }

    #[test]
    fn test_jump_impulse_and_no_double_jump() {
        let mut p = Player::grounded(GROUND_Y);
        jump(&mut p);
        assert_eq!(p.vel_y, -10.0);
        assert!(p.is_jumping);

        // Second intent before landing changes nothing
        jump(&mut p);
        assert_eq!(p.vel_y, -10.0);

        step(&mut p, GROUND_Y);
        assert!((p.vel_y - (-9.4)).abs() < 1e-5);
        assert!((p.y - (GROUND_Y - 9.4)).abs() < 1e-4);

        jump(&mut p);
        assert!((p.vel_y - (-9.4)).abs() < 1e-5);
    }

    #[test]
    fn test_jump_lands_and_clears_flag() {
        let mut p = Player::grounded(GROUND_Y);
        jump(&mut p);

        let mut apex = GROUND_Y;
        let mut frames = 0;
        while p.is_jumping {
            step(&mut p, GROUND_Y);
            apex = apex.min(p.y);
            assert!(p.y <= GROUND_Y);
            frames += 1;
            assert!(frames < 100, "never landed");
        }

        assert_eq!(p.y, GROUND_Y);
        assert_eq!(p.vel_y, 0.0);
        // v²/2g ≈ 83px with some discretization slack
        assert!(GROUND_Y - apex > 75.0 && GROUND_Y - apex < 90.0);

        // Can jump again once landed
        jump(&mut p);
        assert!(p.is_jumping);
    }
}
