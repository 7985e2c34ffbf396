//! Rendering pipeline implementation

use nalgebra::{Vector2, Vector3, Vector4};

use crate::framebuffer::Framebuffer;
use crate::utils::clamp;

/// A complete shader program, abstracted over its three payload types.
///
/// The rasterizer never inspects `Attribs`, `Varyings` or `Uniforms`; it only
/// owns the call ordering. Per triangle, `vertex` runs once for each of the
/// three vertices in order, then per covered fragment `interpolate` collapses
/// the recorded per-vertex varyings with that fragment's barycentric weights
/// before `fragment` computes a color.
///
/// Monomorphization keeps the inner rasterization loop free of indirect
/// calls, so shader code can be inlined into it.
pub trait Shader {
    /// Per-draw vertex inputs, read by the vertex stage
    type Attribs;
    /// Per-triangle scratch written by the vertex stage and read by the fragment stage
    type Varyings;
    /// Per-draw constants
    type Uniforms;

    /// Transform the `nth` vertex (0, 1 or 2) into clip space, recording its
    /// outputs in `varyings` keyed by `nth`.
    fn vertex(&self, nth: usize, attribs: &Self::Attribs, varyings: &mut Self::Varyings, uniforms: &Self::Uniforms) -> Vector4<f32>;

    /// Collapse the three per-vertex varying records into a single
    /// fragment-scoped record using the given barycentric weights.
    ///
    /// The weights sum to 1 and the weighting must be linear; see the
    /// [`Interpolate`](crate::interpolate::Interpolate) helpers.
    fn interpolate(&self, varyings: &mut Self::Varyings, weights: &Vector3<f32>);

    /// Shade one fragment. Components are RGB(A) in `[0,1]`; out-of-range
    /// values are clamped per channel on write and alpha is ignored by the
    /// RGB color buffer.
    fn fragment(&self, varyings: &Self::Varyings, uniforms: &Self::Uniforms) -> Vector4<f32>;
}

/// A shader bundled with the payloads it understands.
///
/// The program is owned and filled by the application; the rasterizer borrows
/// it only for the duration of one draw call.
pub struct Program<S: Shader> {
    pub shader: S,
    pub attribs: S::Attribs,
    pub varyings: S::Varyings,
    pub uniforms: S::Uniforms,
}

impl<S: Shader> Program<S> {
    pub fn new(shader: S, attribs: S::Attribs, varyings: S::Varyings, uniforms: S::Uniforms) -> Program<S> {
        Program { shader, attribs, varyings, uniforms }
    }
}

/// Triangle rasterizer over a framebuffer.
pub struct Pipeline {
    framebuffer: Framebuffer,
}

impl Pipeline {
    /// Create a new rendering pipeline instance
    pub fn new(framebuffer: Framebuffer) -> Pipeline {
        Pipeline { framebuffer }
    }

    /// Returns a reference to the framebuffer
    pub fn framebuffer(&self) -> &Framebuffer { &self.framebuffer }

    /// Returns a mutable reference to the framebuffer
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer { &mut self.framebuffer }

    /// Consume the pipeline and return the framebuffer
    pub fn into_framebuffer(self) -> Framebuffer { self.framebuffer }

    /// Rasterize one triangle through the given program.
    ///
    /// Triangles with any vertex outside the view volume are rejected whole
    /// (no near-plane clipping), and triangles that are clockwise in NDC are
    /// culled as back-facing. Fragments pass a strictly-less-than depth test
    /// against the depth buffer before the fragment stage runs.
    pub fn draw_triangle<S: Shader>(&mut self, program: &mut Program<S>) {
        let width = self.framebuffer.width();
        let height = self.framebuffer.height();

        // vertex stage, with naive whole-triangle view volume rejection
        let mut clip_coords = [Vector4::zeros(); 3];

        for nth in 0..3 {
            clip_coords[nth] = program.shader.vertex(
                nth, &program.attribs, &mut program.varyings, &program.uniforms,
            );

            if outside_view_volume(&clip_coords[nth]) {
                return;
            }
        }

        // perspective division
        let mut ndc_coords = [Vector4::zeros(); 3];

        for nth in 0..3 {
            ndc_coords[nth] = clip_coords[nth] / clip_coords[nth].w;
        }

        if is_back_facing(&ndc_coords) {
            return;
        }

        // screen mapping
        let viewport = *self.framebuffer.viewport();
        let mut screen_coords = [Vector4::zeros(); 3];
        let mut screen_points = [Vector2::zeros(); 3];

        for nth in 0..3 {
            screen_coords[nth] = viewport * ndc_coords[nth];
            screen_points[nth] = screen_coords[nth].xy();
        }

        let [a, b, c] = screen_points;

        // no area in screen space, nothing to traverse
        let ab = b - a;
        let ac = c - a;
        if (ab.x * ac.y - ab.y * ac.x).abs() <= f32::EPSILON {
            return;
        }

        let bounds = BoundingBox::enclose(width, height, &screen_points);

        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let point = Vector2::new(x as f32, y as f32);
                let weights = barycentric_weights(&a, &b, &c, &point);

                if weights.x >= 0.0 && weights.y >= 0.0 && weights.z >= 0.0 {
                    let index = (y as u32 * width + x as u32) as usize;
                    let depth = interpolate_depth(&screen_coords, &weights);

                    // early depth test
                    if depth < self.framebuffer.depth_at(index) {
                        program.shader.interpolate(&mut program.varyings, &weights);

                        let color = program.shader.fragment(&program.varyings, &program.uniforms);

                        self.framebuffer.write_pixel(x as u32, y as u32, &color);
                        self.framebuffer.set_depth(index, depth);
                    }
                }
            }
        }
    }
}

/// A clip-space vertex is outside the view volume when any component leaves
/// `[-w, w]`, i.e. the unit cube after perspective division.
fn outside_view_volume(clip: &Vector4<f32>) -> bool {
    let w = clip.w;

    clip.x < -w || clip.x > w || clip.y < -w || clip.y > w || clip.z < -w || clip.z > w
}

/// Counter-clockwise triangles in NDC (under y-up) are front-facing.
fn is_back_facing(ndc_coords: &[Vector4<f32>; 3]) -> bool {
    let ab = ndc_coords[1].xy() - ndc_coords[0].xy();
    let ac = ndc_coords[2].xy() - ndc_coords[0].xy();

    ab.x * ac.y - ab.y * ac.x < 0.0
}

/// Barycentric weights of `point` with respect to the triangle `(a, b, c)`.
///
/// Solves `P = A + s*AB + t*AC`, so that `P = (1-s-t)*A + s*B + t*C`; the
/// point is inside the triangle iff all three weights are non-negative. For a
/// degenerate triangle the weights come out NaN, which fails that test.
fn barycentric_weights(a: &Vector2<f32>, b: &Vector2<f32>, c: &Vector2<f32>, point: &Vector2<f32>) -> Vector3<f32> {
    let ab = b - a;
    let ac = c - a;
    let ap = point - a;

    let denom = ab.x * ac.y - ab.y * ac.x;
    let s = (ac.y * ap.x - ac.x * ap.y) / denom;
    let t = (ab.x * ap.y - ab.y * ap.x) / denom;

    Vector3::new(1.0 - s - t, s, t)
}

/// Screen-space depth of the fragment, linear in the barycentric weights.
fn interpolate_depth(screen_coords: &[Vector4<f32>; 3], weights: &Vector3<f32>) -> f32 {
    screen_coords[0].z * weights.x + screen_coords[1].z * weights.y + screen_coords[2].z * weights.z
}

struct BoundingBox {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl BoundingBox {
    /// Integer pixel bounds of the triangle, clamped to the framebuffer.
    fn enclose(width: u32, height: u32, points: &[Vector2<f32>; 3]) -> BoundingBox {
        let min_x = points.iter().map(|point| point.x).fold(f32::INFINITY, f32::min);
        let min_y = points.iter().map(|point| point.y).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|point| point.x).fold(f32::NEG_INFINITY, f32::max);
        let max_y = points.iter().map(|point| point.y).fold(f32::NEG_INFINITY, f32::max);

        BoundingBox {
            min_x: clamp(min_x.floor() as i32, 0, width as i32 - 1),
            min_y: clamp(min_y.floor() as i32, 0, height as i32 - 1),
            max_x: clamp(max_x.ceil() as i32, 0, width as i32 - 1),
            max_y: clamp(max_y.ceil() as i32, 0, height as i32 - 1),
        }
    }
}
