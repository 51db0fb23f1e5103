use crate::full_math::{bit_len, q128, zero};
use perp_types::Q128_SHIFT;
use soroban_sdk::{Env, U256};

/// floor(2^128 * 2^(-2^-(i+1))) for i in 0..64
const EXP2_NEG_FRAC: [u128; 64] = [
    240615969168004511545033772477625056927,
    286142222517866327586855861304318312414,
    312040306297756043528438546211487503610,
    325855510927366467338765757798166302659,
    332990817489906152516528174760363655116,
    336616849754143321171240736068313607683,
    338444645961211524111694060679677685513,
    339362262485680770294711564297527942524,
    339822003293300968391941903755125245321,
    340052107201910159018235275086188756486,
    340167217578529594754386235778394637196,
    340224787378186065024124058177160890957,
    340253575931572222344808541527975417861,
    340267971121744950115931523046122852714,
    340275168945212498243824544813253388216,
    340278767914042977419818114301068315674,
    340280567412732569420752589735540255585,
    340281467165645975541538300962849720626,
    340281917042994833884159925800699069144,
    340282141981892302220047427165751816689,
    340282254451396796222137840463944662897,
    340282310686162983187095027395548206958,
    340282338803549561661223530468750597251,
    340282352862243722146284248737311181623,
    340282359891591020200824223221658257108,
    340282363406264723681097926634783937781,
    340282365163601589034485871425767421621,
    340282366042270025114492637597574848943,
    340282366481604244005324221690708811930,
    340282366701271353663447064309477272527,
    340282366811104908545685248301961112247,
    340282366866021686000098530973984089421,
    340282366893480074730628719979566611706,
    340282366907209269096724701399828852445,
    340282366914073866279980413839337495360,
    340282366917506164871660200491437419659,
    340282366919222314167513076425573935295,
    340282366920080388815442760044663850582,
    340282366920509426139408413267214224979,
    340282366920723944801391442731740766665,
    340282366920831204132383008177316876167,
    340282366920884833797878803578433140587,
    340282366920911648630626704448573325215,
    340282366920925056047000655676038930634,
    340282366920931759755187631487870611619,
    340282366920935111609281119443311171681,
    340282366920936787536327863433412631604,
    340282366920937625499851235431558656539,
    340282366920938044481612921431405492749,
    340282366920938253972493764431522366791,
    340282366920938358717934185931629167795,
    340282366920938411090654396681694659293,
    340282366920938437277014502056730427791,
    340282366920938450370194554744249067728,
    340282366920938456916784581088008576618,
    340282366920938460190079594259888378293,
    340282366920938461826727100845828290938,
    340282366920938462645050854138798250213,
    340282366920938463054212730785283230588,
    340282366920938463258793669108525720960,
    340282366920938463361084138270146966193,
    340282366920938463412229372850957588820,
    340282366920938463437801990141362900137,
    340282366920938463450588298786565555796,
];

/// 2^(-num/den) in Q128, floor-rounded.
///
/// The integer part of the exponent becomes a right shift; the fractional
/// part is taken to 64 bits and expanded bit by bit against
/// `EXP2_NEG_FRAC`. A zero numerator or denominator yields 1.0.
pub fn exp2_neg(env: &Env, num: &U256, den: &U256) -> U256 {
    let zero = zero(env);
    let one = q128(env);
    if num == &zero || den == &zero {
        return one;
    }

    let whole = num.div(den);
    if whole >= U256::from_u32(env, 128) {
        return zero;
    }
    let halvings = whole.to_u128().unwrap_or(128) as u32;

    let rem = num.rem_euclid(den);
    let frac = if bit_len(env, den) <= 192 {
        rem.shl(64).div(den)
    } else {
        rem.div(&den.shr(64))
    };
    let frac = frac.to_u128().unwrap_or(u64::MAX as u128).min(u64::MAX as u128) as u64;

    let mut result = one;
    for (i, c) in EXP2_NEG_FRAC.iter().enumerate() {
        if (frac >> (63 - i)) & 1 == 1 {
            result = result.mul(&U256::from_u128(env, *c)).shr(Q128_SHIFT);
        }
    }
    result.shr(halvings)
}

/// 2^(-elapsed/half_life) in Q128; 1.0 when the half-life is 0 (disabled)
pub fn half_life_factor(env: &Env, elapsed: u64, half_life: u64) -> U256 {
    if half_life == 0 {
        return q128(env);
    }
    exp2_neg(
        env,
        &U256::from_u128(env, elapsed as u128),
        &U256::from_u128(env, half_life as u128),
    )
}
