#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTips {
    pub setup: &'static str,
    pub execution: &'static str,
    pub breathing: &'static str,
    pub common_mistakes: &'static [&'static str],
}

const FORM_TIPS: &[(&str, FormTips)] = &[
    (
        "Flat Barbell Bench Press",
        FormTips {
            setup: "Lie flat on bench, feet firmly planted on floor. Grip bar slightly wider than shoulder-width. Retract shoulder blades and arch back slightly.",
            execution: "Lower bar to chest with control, pause briefly, then press explosively to start position. Keep elbows at 45° angle to body.",
            breathing: "Inhale during descent, hold breath at bottom, exhale forcefully during press.",
            common_mistakes: &[
                "Bouncing bar off chest",
                "Lifting feet off floor",
                "Flaring elbows too wide",
                "Not retracting shoulder blades",
            ],
        },
    ),
    (
        "Barbell Curls",
        FormTips {
            setup: "Stand upright, feet shoulder-width apart. Grip bar with underhand grip, arms fully extended.",
            execution: "Curl bar upward by contracting biceps, keep elbows stationary. Squeeze at top, lower with control.",
            breathing: "Exhale during curl, inhale during lowering phase.",
            common_mistakes: &[
                "Swinging the body",
                "Moving elbows forward",
                "Not fully extending arms",
                "Using momentum",
            ],
        },
    ),
    (
        "Lat Pulldowns",
        FormTips {
            setup: "Sit at machine, adjust thigh pad. Grip bar wider than shoulders with overhand grip. Lean back slightly.",
            execution: "Pull bar to upper chest by contracting lats. Squeeze shoulder blades together. Control the return.",
            breathing: "Exhale during pull, inhale during return.",
            common_mistakes: &[
                "Pulling behind neck",
                "Using arms instead of back",
                "Not squeezing shoulder blades",
                "Leaning too far back",
            ],
        },
    ),
    (
        "Bent-over Rows",
        FormTips {
            setup: "Stand with feet hip-width apart, bend at hips. Keep back straight, grip bar with overhand grip.",
            execution: "Pull bar to lower chest/upper abdomen. Squeeze shoulder blades together. Lower with control.",
            breathing: "Exhale during pull, inhale during lowering.",
            common_mistakes: &[
                "Rounding the back",
                "Standing too upright",
                "Not squeezing shoulder blades",
                "Using momentum",
            ],
        },
    ),
    (
        "Close-grip Bench Press",
        FormTips {
            setup: "Lie on bench, grip bar with hands about shoulder-width apart. Maintain slight arch in back.",
            execution: "Lower bar to chest keeping elbows close to body. Press up explosively, focusing on triceps.",
            breathing: "Inhale during descent, exhale during press.",
            common_mistakes: &[
                "Grip too narrow",
                "Flaring elbows out",
                "Not going to chest",
                "Using chest instead of triceps",
            ],
        },
    ),
    (
        "Overhead Press",
        FormTips {
            setup: "Stand with feet shoulder-width apart. Grip bar at shoulder level, elbows under wrists.",
            execution: "Press bar straight overhead, keep core tight. Bar should travel in straight line over shoulders.",
            breathing: "Big breath at bottom, exhale at top.",
            common_mistakes: &[
                "Pressing forward instead of up",
                "Not engaging core",
                "Excessive back arch",
                "Not fully extending overhead",
            ],
        },
    ),
    (
        "Dumbbell Lateral Raises",
        FormTips {
            setup: "Stand upright holding dumbbells at sides. Slight bend in elbows, palms facing down.",
            execution: "Raise weights out to sides until parallel to floor. Control the descent. Lead with pinkies.",
            breathing: "Exhale during raise, inhale during lowering.",
            common_mistakes: &[
                "Going too heavy",
                "Raising above parallel",
                "Using momentum",
                "Not controlling the negative",
            ],
        },
    ),
    (
        "Barbell Squats",
        FormTips {
            setup: "Bar on upper traps, feet slightly wider than shoulders. Toes slightly pointed out.",
            execution: "Descend by pushing hips back and bending knees. Keep chest up, knees track over toes. Drive through heels.",
            breathing: "Big breath at top, hold during descent, exhale during ascent.",
            common_mistakes: &[
                "Knees caving inward",
                "Not hitting depth",
                "Forward lean",
                "Rising hips first",
            ],
        },
    ),
    (
        "Romanian Deadlifts",
        FormTips {
            setup: "Hold bar with overhand grip, feet hip-width apart. Slight bend in knees throughout movement.",
            execution: "Push hips back while lowering bar along legs. Feel hamstring stretch, then drive hips forward to return.",
            breathing: "Inhale at top, exhale during hip drive.",
            common_mistakes: &[
                "Bending knees too much",
                "Rounding the back",
                "Not pushing hips back",
                "Bar drifting away from body",
            ],
        },
    ),
    (
        "Leg Press",
        FormTips {
            setup: "Sit in machine, feet on platform shoulder-width apart. Back flat against pad, core engaged.",
            execution: "Lower weight by bending knees to 90°. Press through heels to return to start position.",
            breathing: "Inhale during descent, exhale during press.",
            common_mistakes: &[
                "Feet placement too high/low",
                "Not going to 90°",
                "Knees caving in",
                "Using partial range of motion",
            ],
        },
    ),
    (
        "Calf Raises",
        FormTips {
            setup: "Stand on balls of feet on platform edge. Hold weight or use machine for resistance.",
            execution: "Rise up on toes as high as possible, pause, then lower below platform level for stretch.",
            breathing: "Exhale during raise, inhale during stretch.",
            common_mistakes: &[
                "Not getting full stretch",
                "Bouncing at bottom",
                "Not pausing at top",
                "Using momentum",
            ],
        },
    ),
];

/// Form tips of an exercise of the training plan, looked up by its name ignoring case.
#[must_use]
pub fn exercise_tips(name: &str) -> Option<&'static FormTips> {
    let name = name.trim();
    FORM_TIPS
        .iter()
        .find(|(exercise, _)| exercise.eq_ignore_ascii_case(name))
        .map(|(_, tips)| tips)
}
