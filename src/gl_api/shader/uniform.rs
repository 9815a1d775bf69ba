use cgmath::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3, Vector4};

pub type UniformLocation = ::gl::types::GLint;

/// A value that can be written to a single uniform location.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    UInt(u32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    /// Column major
    Mat3([[f32; 3]; 3]),
    /// Column major
    Mat4([[f32; 4]; 4]),
}

pub trait Uniform {
    fn uniform_value(&self) -> UniformValue;
}

// Macro cleanliness means that we can't use `self` in the macro invocation scope
// without first introducing it into scope there (slightly unfortunate)
macro_rules! uniform {
    ($self:ident, $type:ty => $variant:ident($expr:expr)) => {
        impl Uniform for $type {
            #[inline(always)]
            fn uniform_value(&$self) -> UniformValue {
                UniformValue::$variant($expr)
            }
        }
    };
}

uniform!(self, bool                 => Int(i32::from(*self)));
uniform!(self, i32                  => Int(*self));
uniform!(self, u32                  => UInt(*self));
uniform!(self, f32                  => Float(*self));

uniform!(self, [f32; 1]             => Float(self[0]));
uniform!(self, [f32; 2]             => Vec2(*self));
uniform!(self, [f32; 3]             => Vec3(*self));
uniform!(self, [f32; 4]             => Vec4(*self));
uniform!(self, (f32, f32)           => Vec2([self.0, self.1]));
uniform!(self, (f32, f32, f32)      => Vec3([self.0, self.1, self.2]));
uniform!(self, (f32, f32, f32, f32) => Vec4([self.0, self.1, self.2, self.3]));
uniform!(self, Vector2<f32>         => Vec2((*self).into()));
uniform!(self, Vector3<f32>         => Vec3((*self).into()));
uniform!(self, Vector4<f32>         => Vec4((*self).into()));
uniform!(self, Point2<f32>          => Vec2([self.x, self.y]));
uniform!(self, Point3<f32>          => Vec3([self.x, self.y, self.z]));

uniform!(self, [i32; 2]             => IVec2(*self));
uniform!(self, [i32; 3]             => IVec3(*self));
uniform!(self, [i32; 4]             => IVec4(*self));
uniform!(self, (i32, i32)           => IVec2([self.0, self.1]));
uniform!(self, (i32, i32, i32)      => IVec3([self.0, self.1, self.2]));
uniform!(self, (i32, i32, i32, i32) => IVec4([self.0, self.1, self.2, self.3]));
uniform!(self, Vector2<i32>         => IVec2((*self).into()));
uniform!(self, Vector3<i32>         => IVec3((*self).into()));
uniform!(self, Vector4<i32>         => IVec4((*self).into()));

uniform!(self, Matrix3<f32>         => Mat3((*self).into()));
uniform!(self, Matrix4<f32>         => Mat4((*self).into()));

impl<'a, U: Uniform + ?Sized> Uniform for &'a U {
    fn uniform_value(&self) -> UniformValue {
        (**self).uniform_value()
    }
}
